pub mod reserved_instance;
