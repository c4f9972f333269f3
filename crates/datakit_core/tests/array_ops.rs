use datakit_core::{Array, IndexOutOfRange, Queue};

fn array_of(values: &[i64]) -> Array<i64> {
    values.iter().copied().collect()
}

#[test]
fn length_tracks_pushes_pops_and_deletes() {
    let mut array = Array::new();
    for value in 0..10 {
        assert_eq!(array.push(value), (value + 1) as usize);
    }

    assert_eq!(array.pop(), Some(9));
    assert_eq!(array.delete(0), Some(0));
    assert_eq!(array.delete(3), Some(4));
    assert_eq!(array.len(), 10 - 3);
    assert_eq!(array.values(), &[1, 2, 3, 5, 6, 7, 8]);
}

#[test]
fn pop_on_empty_returns_none() {
    let mut array: Array<String> = Array::new();
    assert_eq!(array.pop(), None);
    assert!(array.is_empty());
}

#[test]
fn lookup_out_of_range_returns_default_without_mutation() {
    let array = array_of(&[4, 5]);

    assert_eq!(array.lookup(1), 5);
    assert_eq!(array.lookup(2), 0);
    assert_eq!(array.lookup(99), 0);
    assert_eq!(
        array.try_lookup(2),
        Err(IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(array.values(), &[4, 5]);
}

#[test]
fn delete_shifts_later_elements_left() {
    let mut array: Array<&str> = vec!["a", "b", "c", "d"].into();

    array.delete(1);
    assert_eq!(array.values(), &["a", "c", "d"]);
    assert_eq!(array.lookup(1), "c");
}

#[test]
fn reverse_in_place() {
    let mut array = array_of(&[1, 2, 3, 4, 5]);
    array.reverse();
    assert_eq!(array.values(), &[5, 4, 3, 2, 1]);

    let mut single = array_of(&[7]);
    single.reverse();
    assert_eq!(single.values(), &[7]);
}

#[test]
fn copy_does_not_alias_original() {
    let original = array_of(&[1, 2, 3]);
    let mut copy = original.copy();

    for index in 0..copy.len() {
        copy.set(index, 100);
    }

    assert_eq!(original.values(), &[1, 2, 3]);
    assert_eq!(copy.values(), &[100, 100, 100]);
}

#[test]
fn merge_concatenates_and_leaves_inputs_untouched() {
    let a = array_of(&[1, 2, 3]);
    let b = array_of(&[10, 20]);

    let merged = a.merge(&b);

    assert_eq!(merged.len(), a.len() + b.len());
    for index in 0..merged.len() {
        let expected = if index < a.len() {
            a.lookup(index)
        } else {
            b.lookup(index - a.len())
        };
        assert_eq!(merged.lookup(index), expected);
    }
    assert_eq!(a.values(), &[1, 2, 3]);
    assert_eq!(b.values(), &[10, 20]);
}

#[test]
fn json_encoding_is_a_plain_array_in_order() {
    let decoded: Array<i64> = serde_json::from_str("[3, 1, 4, 1, 5, 9]").unwrap();

    assert_eq!(decoded.len(), 6);
    assert_eq!(decoded.values(), &[3, 1, 4, 1, 5, 9]);
    assert_eq!(serde_json::to_string(&decoded).unwrap(), "[3,1,4,1,5,9]");
}

#[test]
fn queue_is_first_in_first_out() {
    let mut queue = Queue::new();
    queue.enqueue("first");
    queue.enqueue("second");
    assert_eq!(queue.enqueue("third"), 3);

    assert_eq!(queue.peek(), Some(&"first"));
    assert_eq!(queue.dequeue(), Some("first"));
    assert_eq!(queue.dequeue(), Some("second"));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.dequeue(), Some("third"));
    assert_eq!(queue.dequeue(), None);
    assert!(queue.is_empty());
}
