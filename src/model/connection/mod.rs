pub mod cart_item_connection;
