pub mod files;
pub mod store;

pub use files::{
    atomic_write, config_file, ensure_data_dir, ensure_dir, get_data_dir,
    init_local_data_dir, read_file, state_file,
};
pub use store::{load_state, save_state, PlannerData};
