pub mod panels;
pub mod view;
