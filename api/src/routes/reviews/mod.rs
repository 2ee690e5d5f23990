pub mod delete_review_response;
pub mod delete_review_route;
pub mod list_reviews_route;
