//! Declarative render output.
//!
//! ## Usage
//!
//! Ask the mounted widget for a [`RenderDescription`] each frame and translate
//! its sections into whatever the host renders with.

/// Ordered class/inline-style bag for one rendered section.
///
/// Entries keep insertion order; setting an existing property replaces its
/// value in place so caller overrides stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    /// Creates an empty style map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `property` to `value`, replacing any existing entry.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Looks up the current value of `property`.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Applies every entry of `other` on top of this map.
    pub fn merge(&mut self, other: &StyleMap) {
        for (property, value) in &other.entries {
            self.set(property.clone(), value.clone());
        }
    }

    /// The entries in effective order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// One box in the rendered hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Space-separated class list.
    pub class_name: String,
    /// Inline style of the section.
    pub style: StyleMap,
}

impl Section {
    fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            style: StyleMap::new(),
        }
    }
}

/// The full render output for one frame: a root clipping box, a translated
/// content box, the status indicator area, and the caller's body.
///
/// `C` is the caller's content type, produced by the status renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescription<C> {
    /// Outermost box; clips the indicator while at rest.
    pub root: Section,
    /// Translated box carrying the indicator and the body.
    pub content: Section,
    /// Status indicator area, pulled up above the fold by its own height.
    pub refresh: Section,
    /// Caller-rendered indicator content for the current status and percent.
    pub indicator: C,
    /// Wrapper around the caller's children.
    pub body: Section,
    /// The caller's children, rendered inside the body wrapper.
    pub children: Option<C>,
}

pub(crate) struct RenderInput<'a> {
    pub prefix: &'a str,
    pub class_name: Option<&'a str>,
    pub style: Option<&'a StyleMap>,
    pub head_height: f32,
    pub offset_y: f32,
    pub duration: u32,
}

pub(crate) fn describe<C>(
    input: RenderInput<'_>,
    indicator: C,
    children: Option<C>,
) -> RenderDescription<C> {
    let RenderInput {
        prefix,
        class_name,
        style,
        head_height,
        offset_y,
        duration,
    } = input;

    let mut root = Section::new(match class_name {
        Some(extra) => format!("{prefix} {extra}"),
        None => prefix.to_owned(),
    });
    root.style.set("min-height", format!("{head_height}px"));
    root.style.set("overflow-y", "hidden");
    root.style.set("touch-action", "pan-y");
    if let Some(overrides) = style {
        root.style.merge(overrides);
    }

    let mut content = Section::new(format!("{prefix}__content"));
    content.style.set("will-change", "transform");
    content.style.set("transition", format!("all {duration}ms"));
    content
        .style
        .set("transform", format!("translate3d(0, {offset_y}px, 0)"));

    let mut refresh = Section::new(format!("{prefix}__refresh"));
    refresh.style.set("height", format!("{head_height}px"));
    refresh.style.set("margin-top", format!("{}px", -head_height));

    RenderDescription {
        root,
        content,
        refresh,
        indicator,
        body: Section::new(format!("{prefix}__body")),
        children,
    }
}
