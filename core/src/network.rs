pub mod prober;
