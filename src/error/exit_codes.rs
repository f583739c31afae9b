use crate::error::OsdetError;

pub fn get_exit_code(error: &OsdetError) -> i32 {
    match error {
        OsdetError::InvalidConfig(_) | OsdetError::ConfigFile(_) => 2,

        OsdetError::UnsupportedPlatform { .. } => 3,

        _ => 1,
    }
}
