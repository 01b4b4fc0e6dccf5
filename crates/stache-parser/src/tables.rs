//! Static lookup tables for element names.

/// Tag-name prefix that marks a custom component.
pub const COMPONENT_PREFIX: &str = "rv-";

/// Elements whose content keeps its whitespace.
pub const PRESERVE_WHITESPACE_TAG: &str = "pre";

/// Void elements never have children or a closing tag. `doctype` is listed so
/// that `<!DOCTYPE html>` does not swallow the rest of the document.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "doctype", "embed", "hr", "img", "input", "keygen",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Plain HTML elements that can be safely inserted as markup.
///
/// Anything else (SVG, MathML, custom tags) must go through the structured
/// form.
pub const HTML_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "address", "applet", "area", "b", "base", "basefont", "bdo", "big",
    "blockquote", "body", "br", "button", "caption", "center", "cite", "code", "col",
    "colgroup", "dd", "del", "dfn", "dir", "div", "dl", "dt", "em", "fieldset", "font", "form",
    "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "html", "i",
    "iframe", "img", "input", "ins", "isindex", "kbd", "label", "legend", "li", "link", "map",
    "menu", "meta", "noframes", "noscript", "object", "ol", "p", "param", "pre", "q", "s",
    "samp", "script", "select", "small", "span", "strike", "strong", "style", "sub", "sup",
    "textarea", "title", "tt", "u", "ul", "var", "article", "aside", "audio", "bdi", "canvas",
    "command", "data", "datagrid", "datalist", "details", "embed", "eventsource",
    "figcaption", "figure", "footer", "header", "hgroup", "keygen", "mark", "meter", "nav",
    "output", "progress", "ruby", "rp", "rt", "section", "source", "summary", "time", "track",
    "video", "wbr",
];

/// SVG element names that are case-sensitive.
pub const SVG_CAMEL_CASE_ELEMENTS: &[&str] = &[
    "altGlyph", "altGlyphDef", "altGlyphItem", "animateColor", "animateMotion",
    "animateTransform", "clipPath", "feBlend", "feColorMatrix", "feComponentTransfer",
    "feComposite", "feConvolveMatrix", "feDiffuseLighting", "feDisplacementMap",
    "feDistantLight", "feFlood", "feFuncA", "feFuncB", "feFuncG", "feFuncR", "feGaussianBlur",
    "feImage", "feMerge", "feMergeNode", "feMorphology", "feOffset", "fePointLight",
    "feSpecularLighting", "feSpotLight", "feTile", "feTurbulence", "foreignObject", "glyphRef",
    "linearGradient", "radialGradient", "textPath", "vkern",
];

/// SVG attribute names that are case-sensitive.
pub const SVG_CAMEL_CASE_ATTRIBUTES: &[&str] = &[
    "attributeName", "attributeType", "baseFrequency", "baseProfile", "calcMode",
    "clipPathUnits", "contentScriptType", "contentStyleType", "diffuseConstant", "edgeMode",
    "externalResourcesRequired", "filterRes", "filterUnits", "glyphRef", "gradientTransform",
    "gradientUnits", "kernelMatrix", "kernelUnitLength", "keyPoints", "keySplines", "keyTimes",
    "lengthAdjust", "limitingConeAngle", "markerHeight", "markerUnits", "markerWidth",
    "maskContentUnits", "maskUnits", "numOctaves", "pathLength", "patternContentUnits",
    "patternTransform", "patternUnits", "pointsAtX", "pointsAtY", "pointsAtZ",
    "preserveAlpha", "preserveAspectRatio", "primitiveUnits", "refX", "refY", "repeatCount",
    "repeatDur", "requiredExtensions", "requiredFeatures", "specularConstant",
    "specularExponent", "spreadMethod", "startOffset", "stdDeviation", "stitchTiles",
    "surfaceScale", "systemLanguage", "tableValues", "targetX", "targetY", "textLength",
    "viewBox", "viewTarget", "xChannelSelector", "yChannelSelector", "zoomAndPan",
];

const P_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dir", "div", "dl", "fieldset", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "menu", "nav", "ol",
    "p", "pre", "section", "table", "ul",
];

/// Check if a lower-cased tag name is a void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Check if a lower-cased tag name is on the plain-HTML whitelist.
pub fn is_html_element(tag: &str) -> bool {
    HTML_ELEMENTS.contains(&tag)
}

/// Correctly-cased SVG element name for a lower-cased tag, if it has one.
pub fn svg_element_name(lower: &str) -> Option<&'static str> {
    camel_case_lookup(SVG_CAMEL_CASE_ELEMENTS, lower)
}

/// Correctly-cased SVG attribute name for a lower-cased name, if it has one.
pub fn svg_attribute_name(lower: &str) -> Option<&'static str> {
    camel_case_lookup(SVG_CAMEL_CASE_ATTRIBUTES, lower)
}

fn camel_case_lookup(table: &'static [&'static str], lower: &str) -> Option<&'static str> {
    table
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(lower))
}

/// Tags whose opening implicitly closes an open element of the given
/// (lower-cased) name, e.g. a new `<li>` closes the previous `<li>`.
pub fn sibling_close_set(tag: &str) -> Option<&'static [&'static str]> {
    let set: &'static [&'static str] = match tag {
        "li" => &["li"],
        "dt" | "dd" => &["dt", "dd"],
        "p" => P_CLOSERS,
        "rt" => &["rt", "rp"],
        "rp" => &["rp", "rt"],
        "optgroup" => &["optgroup"],
        "option" => &["option", "optgroup"],
        "thead" | "tbody" => &["tbody", "tfoot"],
        "tr" => &["tr"],
        "td" | "th" => &["td", "th"],
        _ => return None,
    };
    Some(set)
}
