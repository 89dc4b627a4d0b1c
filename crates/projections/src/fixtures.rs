//! Shared test data.

use common::DocumentId;
use domain::{Exhibit, Rating, Review};

pub(crate) fn review(id: &str, rating: u8, exhibit: Option<&str>) -> Review {
    Review {
        id: DocumentId::new(id),
        name: format!("Reviewer {id}"),
        review: String::new(),
        rating: Rating::new(rating).unwrap(),
        selected_exhibit: exhibit.map(DocumentId::new),
        timestamp: None,
    }
}

/// Two exhibits and three reviews: a=[5,3], b=[4].
pub(crate) fn expo() -> (Vec<Exhibit>, Vec<Review>) {
    (
        vec![
            Exhibit::new("a", "Volcano", "Ana, Ben"),
            Exhibit::new("b", "Battery", "Cy"),
        ],
        vec![
            review("r1", 5, Some("a")),
            review("r2", 3, Some("a")),
            review("r3", 4, Some("b")),
        ],
    )
}
