pub mod scan_time;
