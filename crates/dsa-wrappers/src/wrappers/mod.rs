pub mod connect_v2_aave_v1;
pub mod connect_v2_aave_v2;
pub mod ierc20;
pub mod insta_account_v2;
pub mod insta_connectors_v2;
pub mod insta_index;
pub mod insta_mapping_controller;
