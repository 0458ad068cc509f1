//! Mount-call rewriting for plain-dialect scripts.

use smol_str::SmolStr;

const MOUNT_TOKEN: &str = "mount(";

/// Rewrites a plain script body for its derived module.
///
/// Prepends the runtime import and injects the component name and the
/// serialized property list ahead of the original arguments of the first
/// `mount(` occurrence. Without a `mount(` token the body is returned with
/// only the import prepended.
///
/// Single-pass by design: re-applying this to already-rewritten text would
/// duplicate the import line.
pub fn rewrite_mount(script: &str, component: &str, props: &[SmolStr]) -> String {
    let prop_names: Vec<&str> = props.iter().map(|p| p.as_str()).collect();
    // Serialization of a string slice cannot fail.
    let props_json = serde_json::to_string(&prop_names).unwrap_or_else(|_| "[]".to_string());

    let mut output = String::with_capacity(script.len() + 96);
    output.push_str("import { mount } from 'amalgam';\n\n");

    match script.find(MOUNT_TOKEN) {
        Some(at) => {
            output.push_str(&script[..at]);
            output.push_str(&format!("mount(\"{}\", {}, ", component, props_json));
            output.push_str(&script[at + MOUNT_TOKEN.len()..]);
        }
        None => output.push_str(script),
    }

    output
}
