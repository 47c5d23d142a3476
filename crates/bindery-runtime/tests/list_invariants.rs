use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{ListModel, RowsPhase};
use bindery_runtime::{ModelProperty, ObservableList, ViewModel, shared};
use proptest::prelude::*;

type Item = ViewModel<u32>;

fn item(n: u32) -> Rc<Item> {
    Rc::new(ViewModel::new(
        shared(n),
        vec![ModelProperty::read_only("n", |n: &u32| (*n).into())],
    ))
}

#[derive(Debug, Clone)]
enum Op {
    Append(u32),
    /// Remove the item at `index % len`, or a never-added item when empty.
    Remove(usize),
    /// Remove an item that was never added.
    RemoveStranger,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u32>().prop_map(Op::Append),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::RemoveStranger),
    ]
}

proptest! {
    #[test]
    fn items_and_backing_stay_in_lockstep(ops in proptest::collection::vec(op(), 0..64)) {
        let list = ObservableList::<Item>::new();
        let mut mirror: Vec<Rc<Item>> = Vec::new();

        for op in ops {
            match op {
                Op::Append(n) => {
                    let it = item(n);
                    list.append(Rc::clone(&it)).unwrap();
                    mirror.push(it);
                }
                Op::Remove(i) if !mirror.is_empty() => {
                    let it = mirror.remove(i % mirror.len());
                    prop_assert!(list.remove(&it).unwrap());
                    prop_assert!(!list.remove(&it).unwrap());
                }
                Op::Remove(_) | Op::RemoveStranger => {
                    prop_assert!(!list.remove(&item(0)).unwrap());
                }
            }

            let backing = list.backing();
            let backing = backing.borrow();
            prop_assert_eq!(list.len(), backing.len());
            prop_assert_eq!(list.len(), mirror.len());
            for (i, expected) in mirror.iter().enumerate() {
                let got = list.get(i).unwrap();
                prop_assert!(Rc::ptr_eq(&got, expected));
                prop_assert!(Rc::ptr_eq(&got.model(), &backing[i]));
            }
        }
    }

    #[test]
    fn every_mutation_is_bracketed(ops in proptest::collection::vec(op(), 0..48)) {
        let list = ObservableList::<Item>::new();
        let log: Rc<RefCell<Vec<(RowsPhase, usize)>>> = Rc::new(RefCell::new(Vec::new()));
        let weak = Rc::downgrade(&list);
        let l = Rc::clone(&log);
        list.rows_changed().connect(move |change| {
            let len = weak.upgrade().map_or(0, |list| list.row_count());
            l.borrow_mut().push((change.phase, len));
            Ok(())
        });

        let mut live: Vec<Rc<Item>> = Vec::new();
        let mut mutations = 0;
        for op in ops {
            match op {
                Op::Append(n) => {
                    let it = item(n);
                    list.append(Rc::clone(&it)).unwrap();
                    live.push(it);
                    mutations += 1;
                }
                Op::Remove(i) if !live.is_empty() => {
                    let it = live.remove(i % live.len());
                    list.remove(&it).unwrap();
                    mutations += 1;
                }
                Op::Remove(_) | Op::RemoveStranger => {
                    list.remove(&item(0)).unwrap();
                }
            }
        }

        let log = log.borrow();
        prop_assert_eq!(log.len(), mutations * 2);
        for pair in log.chunks(2) {
            prop_assert_eq!(pair[0].0, RowsPhase::Begin);
            prop_assert_eq!(pair[1].0, RowsPhase::End);
            prop_assert_ne!(pair[0].1, pair[1].1);
        }
    }
}
