//! The host dev-server seam.

use camino::Utf8Path;

/// Handle to the host build tool's dev server.
///
/// The plugin drives module invalidation and reload through this trait;
/// the concrete implementation is owned by the host. Methods take `&self`
/// so a handle can be shared across hooks; implementors use interior
/// mutability where they keep state.
pub trait DevServer {
    /// Registers a template file with the host's file-watch facility.
    fn add_watch_file(&self, path: &Utf8Path);

    /// Invalidates and reloads a synthetic module if it is currently
    /// loaded. Returns true iff the module was loaded.
    fn invalidate_module(&self, id: &str) -> bool;

    /// Requests a full client reload.
    fn full_reload(&self);
}
