pub mod audio;
pub mod net;
pub mod storage;

pub use audio::{AudioSink, PlayConf, SilentAudio};
pub use net::{Net, NetHandler, NetMessage, Transport};
pub use storage::{FileStorage, MemoryStorage, Storage};
