/// Route component constants shared across crates
pub const APP_ROUTE_COMPONENT: &str = "app";
pub const APP_ROUTE_PREFIX: &str = const_str::concat!("/", APP_ROUTE_COMPONENT);

pub const WEBHOOK_ROUTE_COMPONENT: &str = "webhooks";
pub const WEBHOOK_ROUTE_PREFIX: &str = const_str::concat!("/", WEBHOOK_ROUTE_COMPONENT);

pub const FEED_ROUTE_COMPONENT: &str = "feed";
pub const FEED_ROUTE_PREFIX: &str = const_str::concat!("/", FEED_ROUTE_COMPONENT);

pub const FEED_FILE_NAME: &str = "calendar.ics";

/// PRODID stamped on every generated calendar document.
pub const FEED_PRODID: &str = "-//Guidepost//Guidepost Availability Engine//EN";
