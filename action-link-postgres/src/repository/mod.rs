pub mod action_link;
pub mod audit;
pub mod db_init;
pub mod sales;
pub mod tenant;
