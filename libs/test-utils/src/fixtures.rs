//! Request bodies that pass validation for each resource.

use serde_json::{Value, json};

pub fn contact_payload() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "favoriteColor": "green",
        "birthday": "1815-12-10",
        "phoneNumber": "+44 20 7946 0958",
        "address": {
            "street": "12 St James's Square",
            "city": "London",
            "state": "LDN",
            "zipCode": "12345"
        }
    })
}

pub fn author_payload() -> Value {
    json!({
        "firstName": "Ursula",
        "lastName": "Le Guin",
        "birthDate": "1929-10-21",
        "nationality": "American",
        "biography": "Author of Earthsea and the Hainish Cycle.",
        "awards": [{"name": "Hugo Award", "year": 1970}],
        "website": "https://www.ursulakleguin.com"
    })
}

pub fn book_payload(author_id: &str, isbn: &str) -> Value {
    json!({
        "title": "The Left Hand of Darkness",
        "author": author_id,
        "isbn": isbn,
        "publicationYear": 1969,
        "genre": "Science Fiction",
        "price": 12.5,
        "description": "An envoy visits the planet Gethen."
    })
}

pub fn item_payload() -> Value {
    json!({
        "name": "Desk lamp",
        "description": "Adjustable LED lamp",
        "price": 24.99,
        "stock": 12,
        "category": "Lighting"
    })
}

pub fn category_payload() -> Value {
    json!({
        "name": "Lighting",
        "description": "Lamps, bulbs and fixtures"
    })
}

pub fn product_payload() -> Value {
    json!({
        "name": "Headphones",
        "price": 89.0,
        "category": "Electronics",
        "features": ["bluetooth", "noise cancelling"]
    })
}

pub fn user_payload(email: &str) -> Value {
    json!({
        "email": email,
        "name": "Grace Hopper",
        "age": 45
    })
}
