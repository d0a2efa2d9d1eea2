pub mod card;
pub mod dialog;
pub mod page;
