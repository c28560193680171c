use std::fmt;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use crate::assets::{SceneFragment, load_gltf};
use crate::errors::Result;

/// Which role a loaded asset fills in the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSlot {
    Environment,
    Character,
}

impl fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::Character => write!(f, "character"),
        }
    }
}

/// One finished load, successful or not, delivered to the frame loop.
pub struct LoadEvent {
    pub slot: AssetSlot,
    pub result: Result<SceneFragment>,
}

/// Kicks off both asset loads on background threads.
///
/// Each load sends exactly one [`LoadEvent`]; the channel closes once both
/// threads finish. Loads can complete in either order.
#[must_use]
pub fn spawn_loads(environment: PathBuf, character: PathBuf) -> flume::Receiver<LoadEvent> {
    let (tx, rx) = flume::unbounded();

    for (slot, path) in [
        (AssetSlot::Environment, environment),
        (AssetSlot::Character, character),
    ] {
        let tx = tx.clone();
        thread::spawn(move || {
            log::info!("loading {slot} from {}", path.display());
            let started = Instant::now();

            let result = load_gltf(&path);
            if result.is_ok() {
                log::info!("loaded {slot} in {:.1?}", started.elapsed());
            }

            // The receiver dropping mid-load just means shutdown.
            let _ = tx.send(LoadEvent { slot, result });
        });
    }

    rx
}
