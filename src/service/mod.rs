pub mod service_loop;
