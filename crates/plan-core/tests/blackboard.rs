use plan_core::{BbKey, Blackboard, BlackboardView, EntityKey, EntityRef, IntKey};

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let k_ammo = IntKey::new(1);
    let k_target = EntityKey::new(2);

    let mut bb = Blackboard::new();
    assert!(!bb.contains(k_ammo));

    bb.set(k_ammo, 12);
    bb.set(k_target, EntityRef(77));

    assert_eq!(bb.get(k_ammo), Some(12));
    assert_eq!(bb.get(k_target), Some(EntityRef(77)));

    assert_eq!(bb.remove(k_ammo), Some(12));
    assert_eq!(bb.get(k_ammo), None);
}

#[test]
fn int_and_entity_keys_with_same_id_do_not_collide() {
    let mut bb = Blackboard::new();
    bb.set(BbKey::<i32>::new(5), -3);
    bb.set(BbKey::<EntityRef>::new(5), EntityRef(9));

    assert_eq!(bb.int(IntKey::new(5)), Some(-3));
    assert_eq!(bb.entity(EntityKey::new(5)), Some(EntityRef(9)));

    bb.clear();
    assert_eq!(bb.int(IntKey::new(5)), None);
    assert_eq!(bb.entity(EntityKey::new(5)), None);
}
