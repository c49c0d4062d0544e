//! Catalog backend tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use spc_domain::Error;
use spc_domain::ports::{Container, ContainerBackend, ResolverExt};
use spc_domain::value_objects::{Lifetime, Registration, RegistrationSet};
use spc_infrastructure::di::{Catalog, CatalogBackend};

use crate::test_utils::{Greeter, english, french, token_registration, Token};

fn catalog_with(registrations: Vec<Registration>) -> Arc<dyn Container> {
    CatalogBackend::new()
        .build(registrations.into_iter().collect())
        .expect("catalog build")
}

#[test]
fn test_singleton_is_shared_across_scopes() {
    let created = Arc::new(AtomicUsize::new(0));
    let catalog = catalog_with(vec![token_registration(Lifetime::Singleton, created.clone())]);

    let root = catalog.resolve::<Token>().unwrap();
    let scope = catalog.create_scope();
    let scoped = scope.resolve::<Token>().unwrap();

    assert_eq!(root.id, scoped.id);
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scoped_is_shared_within_scope_only() {
    let created = Arc::new(AtomicUsize::new(0));
    let catalog = catalog_with(vec![token_registration(Lifetime::Scoped, created.clone())]);

    let first_scope = catalog.create_scope();
    let a = first_scope.resolve::<Token>().unwrap();
    let b = first_scope.resolve::<Token>().unwrap();
    let second_scope = catalog.create_scope();
    let c = second_scope.resolve::<Token>().unwrap();

    assert_eq!(a.id, b.id);
    assert_ne!(a.id, c.id);
    assert_eq!(created.load(Ordering::SeqCst), 2);
}

#[test]
fn test_transient_creates_every_time() {
    let created = Arc::new(AtomicUsize::new(0));
    let catalog = catalog_with(vec![token_registration(Lifetime::Transient, created.clone())]);

    let a = catalog.resolve::<Token>().unwrap();
    let b = catalog.resolve::<Token>().unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(created.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unregistered_service_fails() {
    let catalog = catalog_with(Vec::new());

    match catalog.resolve::<dyn Greeter>() {
        Err(Error::ServiceNotRegistered { service }) => assert!(service.contains("Greeter")),
        Err(other) => panic!("Expected ServiceNotRegistered, got {other}"),
        Ok(_) => panic!("Expected ServiceNotRegistered, got an instance"),
    }
    assert!(catalog.try_resolve::<dyn Greeter>().unwrap().is_none());
}

#[test]
fn test_last_registration_wins_and_resolve_all_keeps_order() {
    let catalog = catalog_with(vec![
        Registration::new(english(), Lifetime::Singleton),
        Registration::new(french(), Lifetime::Singleton),
    ]);

    assert_eq!(catalog.resolve::<dyn Greeter>().unwrap().greet(), "bonjour");

    let all: Vec<String> = catalog
        .resolve_all::<dyn Greeter>()
        .unwrap()
        .iter()
        .map(|greeter| greeter.greet())
        .collect();
    assert_eq!(all, vec!["hello", "bonjour"]);
}

#[test]
fn test_resolve_all_of_unregistered_is_empty() {
    let catalog = catalog_with(Vec::new());
    assert!(catalog.resolve_all::<dyn Greeter>().unwrap().is_empty());
}

#[test]
fn test_factory_resolves_dependencies() {
    struct Loud(Arc<dyn Greeter>);

    let catalog = catalog_with(vec![
        Registration::new(english(), Lifetime::Singleton),
        Registration::transient::<Loud, _>("Loud", |resolver| {
            Ok(Arc::new(Loud(resolver.resolve::<dyn Greeter>()?)))
        }),
    ]);

    let loud = catalog.resolve::<Loud>().unwrap();
    assert_eq!(loud.0.greet().to_uppercase(), "HELLO");
}

#[test]
fn test_factory_error_is_propagated_and_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let catalog = catalog_with(vec![Registration::singleton::<Token, _>("Token", move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(Error::build_failure("first attempt fails"));
        }
        Ok(Arc::new(Token { id: 7 }))
    })]);

    assert!(catalog.resolve::<Token>().is_err());
    assert_eq!(catalog.resolve::<Token>().unwrap().id, 7);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_singleton_resolution_creates_once() {
    let created = Arc::new(AtomicUsize::new(0));
    let catalog = catalog_with(vec![token_registration(Lifetime::Singleton, created.clone())]);

    let ids: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let catalog = &catalog;
                s.spawn(move || catalog.create_scope().resolve::<Token>().unwrap().id)
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_each_catalog_has_distinct_id() {
    let a = Catalog::new(RegistrationSet::new());
    let b = Catalog::new(RegistrationSet::new());
    assert_ne!(a.id(), b.id());
}
