use tokio::task::JoinHandle;

/// Aborts the wrapped task when dropped. Session timers and listeners attach
/// through this guard so no background tick can outlive the session that
/// spawned it.
pub struct AbortOnDrop(JoinHandle<()>);

impl AbortOnDrop {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
