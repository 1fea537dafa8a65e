/// Probe for the capability castbus requires from its host: an ambient
/// tokio runtime on the current thread, used to host each bus's dispatch
/// task. No side effects.
pub fn runtime_available() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}
