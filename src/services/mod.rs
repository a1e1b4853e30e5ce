pub mod fill_poller;
