pub mod poll_loop;
