#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

pub mod images;


#[cfg(not(feature = "log4rs"))]
pub mod logging {
    pub fn init_log() {}
}
