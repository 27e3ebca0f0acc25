//! iCalendar component types (RFC 5545 §3.4–3.6).

use super::Property;

/// Component kind for the subset Guidepost understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTIMEZONE component (carried through, not interpreted).
    Timezone,
    /// VALARM component (nested within VEVENT).
    Alarm,
    /// Anything else, including X-components.
    Unknown,
}

impl ComponentKind {
    /// Parses a component kind from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTIMEZONE" => Self::Timezone,
            "VALARM" => Self::Alarm,
            _ => Self::Unknown,
        }
    }
}

/// An iCalendar component: properties plus nested sub-components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Recognized component type.
    pub kind: ComponentKind,
    /// Original component name (preserved for unknown components).
    pub name: String,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
    /// Nested sub-components.
    pub children: Vec<Component>,
}

impl Component {
    /// Creates an empty component with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: ComponentKind::parse(&name),
            name,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a VCALENDAR component.
    #[must_use]
    pub fn calendar() -> Self {
        Self::named("VCALENDAR")
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub fn event() -> Self {
        Self::named("VEVENT")
    }

    /// Adds a property to this component.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Adds a child component.
    pub fn add_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties.iter().find(|p| p.name == name_upper)
    }

    /// Returns the UID property value if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.get_property("UID").map(|p| p.value.as_str())
    }

    /// Returns the SUMMARY property value (unescaped) if present.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        self.get_property("SUMMARY").map(Property::text_value)
    }

    /// Returns the DESCRIPTION property value (unescaped) if present.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.get_property("DESCRIPTION").map(Property::text_value)
    }

    /// Returns the LOCATION property value (unescaped) if present.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.get_property("LOCATION").map(Property::text_value)
    }

    /// Returns children of a specific kind.
    #[must_use]
    pub fn children_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.children.iter().filter(|c| c.kind == kind).collect()
    }

    /// Returns all VEVENT children.
    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Event)
    }
}

/// Top-level iCalendar object: a VCALENDAR component with helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ICalendar {
    /// The root VCALENDAR component.
    pub root: Component,
}

impl ICalendar {
    /// Creates an empty iCalendar with the required VERSION and PRODID.
    #[must_use]
    pub fn new(prodid: impl AsRef<str>) -> Self {
        let mut root = Component::calendar();
        root.add_property(Property::text("VERSION", "2.0"));
        root.add_property(Property::text("PRODID", prodid));
        Self { root }
    }

    /// Returns the PRODID value.
    #[must_use]
    pub fn prodid(&self) -> Option<&str> {
        self.root.get_property("PRODID").map(|p| p.value.as_str())
    }

    /// Returns the VERSION value.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.root.get_property("VERSION").map(|p| p.value.as_str())
    }

    /// Adds a VEVENT component.
    pub fn add_event(&mut self, event: Component) {
        self.root.add_child(event);
    }

    /// Returns all VEVENT components.
    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.root.events()
    }
}
