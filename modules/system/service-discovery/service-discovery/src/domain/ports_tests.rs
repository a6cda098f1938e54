use std::sync::Arc;

use super::*;

fn consecutive(start: u16, count: u16) -> Vec<u16> {
    (start..start + count).collect()
}

#[test]
fn probe_script_is_parameterized() {
    let script = render_probe_script(5000, 3);
    assert!(script.contains("start_port=5000"));
    assert!(script.contains("port_count=3"));
    assert!(!script.contains("{{"));
}

#[test]
fn parses_whitespace_separated_ports() {
    let ports = parse_ports(Node::new(1), " 5000 5001\n5002\t").unwrap();
    assert_eq!(ports, vec![5000, 5001, 5002]);
    assert!(parse_ports(Node::new(1), "").unwrap().is_empty());
}

#[test]
fn rejects_non_integer_tokens() {
    let err = parse_ports(Node::new(2), "5000 oops 5002").unwrap_err();
    match err {
        DiscoveryError::RemoteExecution { node, reason } => {
            assert_eq!(node, Node::new(2));
            assert!(reason.contains("oops"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_out_of_range_ports() {
    assert!(parse_ports(Node::new(1), "65536").is_err());
}

#[tokio::test]
async fn sequential_reservations_are_disjoint() {
    let allocator = LocalPortAllocator::new();
    assert_eq!(allocator.next_start().await, 0);

    let first = allocator
        .reserve(5000, |start| async move { Ok(consecutive(start, 3)) })
        .await
        .unwrap();
    let second = allocator
        .reserve(5000, |start| async move { Ok(consecutive(start, 3)) })
        .await
        .unwrap();

    assert_eq!(first, vec![5000, 5001, 5002]);
    assert_eq!(second, vec![5003, 5004, 5005]);
    assert_eq!(allocator.next_start().await, 5006);
}

#[tokio::test]
async fn higher_requested_start_wins_over_cursor() {
    let allocator = LocalPortAllocator::new();
    allocator
        .reserve(5000, |start| async move { Ok(consecutive(start, 2)) })
        .await
        .unwrap();

    let ports = allocator
        .reserve(9000, |start| async move { Ok(consecutive(start, 2)) })
        .await
        .unwrap();

    assert_eq!(ports, vec![9000, 9001]);
    assert_eq!(allocator.next_start().await, 9002);
}

#[tokio::test]
async fn failed_search_leaves_cursor_unchanged() {
    let allocator = LocalPortAllocator::new();
    allocator
        .reserve(5000, |start| async move { Ok(consecutive(start, 1)) })
        .await
        .unwrap();

    let result = allocator
        .reserve(5000, |_| async move {
            Err(DiscoveryError::PortCountMismatch {
                expected: 3,
                actual: 0,
            })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(allocator.next_start().await, 5001);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reservations_are_disjoint() {
    let allocator = Arc::new(LocalPortAllocator::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let allocator = Arc::clone(&allocator);
            tokio::spawn(async move {
                allocator
                    .reserve(5000, |start| async move {
                        tokio::task::yield_now().await;
                        Ok(consecutive(start, 3))
                    })
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.await.unwrap());
    }
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 24);
    assert_eq!(all.first(), Some(&5000));
    assert_eq!(all.last(), Some(&5023));
}

#[tokio::test]
async fn top_of_range_is_never_handed_out_twice() {
    let allocator = LocalPortAllocator::new();
    let first = allocator
        .reserve(65534, |start| async move { Ok((start..=u16::MAX).collect()) })
        .await
        .unwrap();
    assert_eq!(first, vec![65534, 65535]);
    assert_eq!(allocator.next_start().await, 65536);

    let searched = std::sync::atomic::AtomicBool::new(false);
    let err = allocator
        .reserve(60000, |start| {
            searched.store(true, std::sync::atomic::Ordering::SeqCst);
            async move { Ok(vec![start]) }
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DiscoveryError::PortRangeExhausted { next_start: 65536 }
    ));
    assert!(!searched.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(allocator.next_start().await, 65536);
}
