//! Registration value object tests

use std::sync::Arc;

use spc_domain::error::{Error, Result};
use spc_domain::ports::{Instance, ServiceResolver};
use spc_domain::value_objects::{
    Implementation, Lifetime, Registration, RegistrationSet, ReplacementMap, ServiceType,
};

trait Storage: Send + Sync {
    fn kind(&self) -> &'static str;
}

struct Memory;

impl Storage for Memory {
    fn kind(&self) -> &'static str {
        "memory"
    }
}

struct Disk;

impl Storage for Disk {
    fn kind(&self) -> &'static str {
        "disk"
    }
}

trait Clock: Send + Sync {}

struct SystemClock;

impl Clock for SystemClock {}

/// Resolver without any registrations
struct Empty;

impl ServiceResolver for Empty {
    fn resolve_service(&self, service: &ServiceType) -> Result<Instance> {
        Err(Error::service_not_registered(service.name()))
    }

    fn resolve_all_services(&self, _service: &ServiceType) -> Result<Vec<Instance>> {
        Ok(Vec::new())
    }

    fn is_registered(&self, _service: &ServiceType) -> bool {
        false
    }
}

fn memory() -> Implementation {
    Implementation::new::<dyn Storage, _>("Memory", |_| Ok(Arc::new(Memory) as Arc<dyn Storage>))
}

fn disk() -> Implementation {
    Implementation::new::<dyn Storage, _>("Disk", |_| Ok(Arc::new(Disk) as Arc<dyn Storage>))
}

fn clock() -> Registration {
    Registration::singleton::<dyn Clock, _>("SystemClock", |_| {
        Ok(Arc::new(SystemClock) as Arc<dyn Clock>)
    })
}

fn kind_of(implementation: &Implementation) -> &'static str {
    let instance = implementation.create(&Empty).unwrap();
    let storage = (*instance).downcast_ref::<Arc<dyn Storage>>().unwrap();
    storage.kind()
}

#[test]
fn test_service_type_identity() {
    assert_eq!(ServiceType::of::<dyn Storage>(), ServiceType::of::<dyn Storage>());
    assert_ne!(ServiceType::of::<dyn Storage>(), ServiceType::of::<dyn Clock>());
    assert!(ServiceType::of::<dyn Storage>().name().contains("Storage"));
}

#[test]
fn test_lifetime_defaults_and_rendering() {
    assert_eq!(Lifetime::default(), Lifetime::Transient);
    assert_eq!(Lifetime::Scoped.to_string(), "scoped");
    assert_eq!(serde_json::to_string(&Lifetime::Singleton).unwrap(), "\"singleton\"");
    assert_eq!(
        serde_json::from_str::<Lifetime>("\"transient\"").unwrap(),
        Lifetime::Transient
    );
}

#[test]
fn test_implementation_defaults() {
    let factory = memory();
    assert_eq!(factory.service(), ServiceType::of::<dyn Storage>());
    assert_eq!(factory.name(), "Memory");
    assert_eq!(factory.default_lifetime(), Lifetime::Transient);

    let fixed = Implementation::instance::<dyn Storage>("Disk", Arc::new(Disk));
    assert_eq!(fixed.default_lifetime(), Lifetime::Singleton);
    assert_eq!(kind_of(&fixed), "disk");

    let scoped = memory().with_default_lifetime(Lifetime::Scoped);
    assert_eq!(Registration::with_default_lifetime(scoped).lifetime(), Lifetime::Scoped);
}

#[test]
fn test_instance_implementation_hands_out_same_value() {
    let value: Arc<dyn Storage> = Arc::new(Memory);
    let fixed = Implementation::instance::<dyn Storage>("Memory", value.clone());

    let created = fixed.create(&Empty).unwrap();
    let resolved = (*created).downcast_ref::<Arc<dyn Storage>>().unwrap();

    assert!(Arc::ptr_eq(resolved, &value));
}

#[test]
fn test_replaced_by_keeps_lifetime() {
    let original = Registration::new(memory(), Lifetime::Singleton);
    let replaced = original.replaced_by(&disk().with_default_lifetime(Lifetime::Transient));

    assert_eq!(replaced.lifetime(), Lifetime::Singleton);
    assert_eq!(replaced.implementation().name(), "Disk");
    assert_eq!(replaced.service(), original.service());
}

#[test]
fn test_try_add_skips_registered_services() {
    let mut set = RegistrationSet::new();

    assert!(set.try_add(Registration::new(memory(), Lifetime::Scoped)));
    assert!(!set.try_add(Registration::new(disk(), Lifetime::Scoped)));
    set.add(Registration::new(disk(), Lifetime::Transient)).add(clock());

    assert_eq!(set.len(), 3);
    let last = set.last_for(&ServiceType::of::<dyn Storage>()).unwrap();
    assert_eq!(last.implementation().name(), "Disk");
    assert!(set.contains(&ServiceType::of::<dyn Clock>()));
}

#[test]
fn test_replace_with_rebinds_every_registration_of_a_service() {
    let set: RegistrationSet = [
        Registration::new(memory(), Lifetime::Singleton),
        Registration::new(memory(), Lifetime::Scoped),
        clock(),
    ]
    .into_iter()
    .collect();
    let replacements = ReplacementMap::new().with(disk());

    let replaced = set.replace_with(&replacements);

    let storages: Vec<(&str, Lifetime)> = replaced
        .iter()
        .filter(|r| r.service() == ServiceType::of::<dyn Storage>())
        .map(|r| (r.implementation().name(), r.lifetime()))
        .collect();
    assert_eq!(
        storages,
        vec![("Disk", Lifetime::Singleton), ("Disk", Lifetime::Scoped)]
    );
    assert_eq!(replaced.len(), 3);
    // original set is untouched
    assert_eq!(
        set.last_for(&ServiceType::of::<dyn Storage>())
            .unwrap()
            .implementation()
            .name(),
        "Memory"
    );
}

#[test]
fn test_replace_with_ignores_unregistered_targets() {
    let set: RegistrationSet = [clock()].into_iter().collect();
    let replaced = set.replace_with(&ReplacementMap::new().with(disk()));

    assert_eq!(replaced.len(), 1);
    assert!(!replaced.contains(&ServiceType::of::<dyn Storage>()));
}

#[test]
fn test_replacement_map_keeps_last_insert_per_service() {
    let mut map = ReplacementMap::new();
    assert!(map.is_empty());

    assert!(map.insert(memory()).is_none());
    let previous = map.insert(disk()).unwrap();

    assert_eq!(previous.name(), "Memory");
    assert_eq!(map.len(), 1);
    assert!(map.contains(&ServiceType::of::<dyn Storage>()));
    assert_eq!(kind_of(map.get(&ServiceType::of::<dyn Storage>()).unwrap()), "disk");
    assert_eq!(map.services().count(), 1);
}

#[test]
fn test_registration_set_iterates_in_insertion_order() {
    let set: RegistrationSet = [
        Registration::new(memory(), Lifetime::Transient),
        clock(),
        Registration::new(disk(), Lifetime::Transient),
    ]
    .into_iter()
    .collect();

    let names: Vec<&str> = (&set)
        .into_iter()
        .map(|r| r.implementation().name())
        .collect();
    assert_eq!(names, vec!["Memory", "SystemClock", "Disk"]);

    let owned: Vec<Registration> = set.into_iter().collect();
    assert_eq!(owned.len(), 3);
}
