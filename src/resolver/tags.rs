//! Ordered-attribute HTML tag assembly.

/// Render an opening tag with the provided attributes, in order.
///
/// Attribute values are written verbatim: they originate from build-time
/// manifests and configuration, never from user input, so no HTML escaping is
/// applied.
pub fn open_tag(name: &str, attributes: &[(&str, &str)]) -> String {
    let mut output = format!("<{name}");
    for (key, value) in attributes {
        output.push_str(&format!(" {key}=\"{value}\""));
    }
    output.push('>');
    output
}
