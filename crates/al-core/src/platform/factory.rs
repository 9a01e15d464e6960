use std::sync::Arc;

use super::adapters::SharedActuation;

pub fn default_actuation() -> SharedActuation {
    #[cfg(target_os = "macos")]
    {
        Arc::new(super::adapters::macos::MacosActuation::new())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(super::adapters::portable::PortableActuation::new())
    }
}
