pub mod company;
pub mod search_link;
