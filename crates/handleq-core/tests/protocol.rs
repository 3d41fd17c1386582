//! End-to-end protocol behavior through the registry.

use handleq_core::{
    DenyReason, ErrorKind, QueueError, SessionHandle, SessionRegistry, SessionStatus,
};

fn enqueue(
    registry: &SessionRegistry,
    handle: SessionHandle,
    value: i32,
) -> Result<usize, QueueError> {
    registry.submit(handle, &value.to_le_bytes())
}

fn drained(registry: &SessionRegistry, handle: SessionHandle) -> Vec<i32> {
    registry
        .drain(handle, 4096)
        .unwrap()
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

#[test]
fn every_capacity_admits_exactly_capacity_elements() {
    let registry = SessionRegistry::new();
    for capacity in 1u8..=100 {
        let handle = registry.attach();
        assert_eq!(registry.submit(handle, &[capacity]), Ok(1));

        for v in 0..capacity as i32 {
            assert_eq!(enqueue(&registry, handle, v), Ok(4), "capacity {capacity}");
        }
        assert_eq!(
            enqueue(&registry, handle, -1),
            Err(QueueError::AccessDenied(DenyReason::QueueFull)),
            "capacity {capacity}"
        );

        registry.detach(handle).unwrap();
    }
    assert!(registry.is_empty());
}

#[test]
fn drain_is_fifo() {
    let registry = SessionRegistry::new();
    let handle = registry.attach();
    registry.submit(handle, &[10]).unwrap();

    let input = [5, -3, 0, i32::MAX, 17, i32::MIN, 42];
    for v in input {
        enqueue(&registry, handle, v).unwrap();
    }
    assert_eq!(drained(&registry, handle), input);
}

#[test]
fn second_drain_is_empty_not_an_error() {
    let registry = SessionRegistry::new();
    let handle = registry.attach();
    registry.submit(handle, &[3]).unwrap();
    enqueue(&registry, handle, 1).unwrap();

    assert_eq!(drained(&registry, handle), vec![1]);
    assert_eq!(registry.drain(handle, 4096).unwrap().len(), 0);
}

#[test]
fn drain_resets_a_full_queue() {
    let registry = SessionRegistry::new();
    let handle = registry.attach();
    registry.submit(handle, &[2]).unwrap();
    enqueue(&registry, handle, 1).unwrap();
    enqueue(&registry, handle, 2).unwrap();
    assert_eq!(
        enqueue(&registry, handle, 3).unwrap_err().kind(),
        ErrorKind::AccessDenied
    );

    assert_eq!(drained(&registry, handle), vec![1, 2]);
    assert_eq!(enqueue(&registry, handle, 3), Ok(4));
    assert_eq!(drained(&registry, handle), vec![3]);
}

#[test]
fn capacity_is_set_once() {
    let registry = SessionRegistry::new();
    let handle = registry.attach();
    registry.submit(handle, &[4]).unwrap();

    for byte in [1u8, 4, 50, 100] {
        assert_eq!(
            registry.submit(handle, &[byte]),
            Err(QueueError::InvalidArgumentSize {
                expected: 4,
                actual: 1
            })
        );
    }
    let session = registry.lookup(handle).unwrap();
    assert!(matches!(
        session.status(),
        SessionStatus::Ready {
            capacity: 4,
            len: 0,
            ..
        }
    ));
}

#[test]
fn reattach_starts_fresh() {
    let registry = SessionRegistry::new();
    let old = registry.attach();
    registry.submit(old, &[2]).unwrap();
    enqueue(&registry, old, 77).unwrap();
    enqueue(&registry, old, 88).unwrap();
    registry.detach(old).unwrap();

    let new = registry.attach();
    let session = registry.lookup(new).unwrap();
    assert_eq!(session.status(), SessionStatus::Uninitialized);
    assert_eq!(
        registry.drain(new, 4096),
        Err(QueueError::AccessDenied(DenyReason::Uninitialized))
    );

    registry.submit(new, &[1]).unwrap();
    assert_eq!(
        registry.drain(new, 4096),
        Err(QueueError::AccessDenied(DenyReason::QueueEmpty))
    );
}

#[test]
fn reference_scenario() {
    let registry = SessionRegistry::new();
    let handle = registry.attach();

    assert_eq!(registry.submit(handle, &[5]), Ok(1));
    for v in [10, 20, 30] {
        assert_eq!(enqueue(&registry, handle, v), Ok(4));
    }

    let out = registry.drain(handle, 12).unwrap();
    assert_eq!(out.len(), 12);
    assert_eq!(
        out.chunks_exact(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect::<Vec<_>>(),
        vec![10, 20, 30]
    );

    enqueue(&registry, handle, 999).unwrap();
    assert_eq!(drained(&registry, handle), vec![999]);

    assert_eq!(
        registry.submit(handle, &[0, 1]),
        Err(QueueError::InvalidArgumentSize {
            expected: 4,
            actual: 2
        })
    );
}

#[test]
fn capacity_boundaries() {
    let registry = SessionRegistry::new();
    let handle = registry.attach();

    assert_eq!(
        registry.submit(handle, &[0]),
        Err(QueueError::InvalidCapacity(0))
    );
    assert_eq!(
        registry.submit(handle, &[101]),
        Err(QueueError::InvalidCapacity(101))
    );

    assert_eq!(registry.submit(handle, &[1]), Ok(1));
    assert_eq!(enqueue(&registry, handle, 1), Ok(4));
    assert_eq!(
        enqueue(&registry, handle, 2),
        Err(QueueError::AccessDenied(DenyReason::QueueFull))
    );
}

#[test]
fn sessions_are_isolated() {
    let registry = SessionRegistry::new();
    let a = registry.attach();
    let b = registry.attach();
    registry.submit(a, &[3]).unwrap();
    registry.submit(b, &[3]).unwrap();

    enqueue(&registry, a, 1).unwrap();
    enqueue(&registry, b, 2).unwrap();
    enqueue(&registry, a, 3).unwrap();

    assert_eq!(drained(&registry, b), vec![2]);
    assert_eq!(drained(&registry, a), vec![1, 3]);
}

#[test]
fn too_small_buffer_keeps_queue_intact() {
    let registry = SessionRegistry::new();
    let handle = registry.attach();
    registry.submit(handle, &[8]).unwrap();
    for v in 0..5 {
        enqueue(&registry, handle, v).unwrap();
    }

    assert_eq!(
        registry.drain(handle, 19).unwrap_err().kind(),
        ErrorKind::InvalidArgumentSize
    );
    assert_eq!(drained(&registry, handle), vec![0, 1, 2, 3, 4]);
}
