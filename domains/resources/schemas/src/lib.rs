//! The resources served by the API, each expressed as a
//! [`ResourceDefinition`] evaluated by the shared pipeline.

pub mod authors;
pub mod books;
pub mod categories;
pub mod contacts;
pub mod items;
pub mod products;
pub mod users;

use resource_models::ResourceDefinition;

/// Every served resource, in mount order.
pub fn catalog() -> Vec<ResourceDefinition> {
    vec![
        contacts::definition(),
        authors::definition(),
        books::definition(),
        items::definition(),
        categories::definition(),
        products::definition(),
        users::definition(),
    ]
}

pub fn find(name: &str) -> Option<ResourceDefinition> {
    catalog().into_iter().find(|definition| definition.name == name)
}
