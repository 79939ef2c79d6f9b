// Widget selection - Ownership filter and start marker injection
use crate::domain::dashboard::{Annotation, Widget};
use chrono::{DateTime, Utc};

/// A widget is owned when one of its metric names starts with the prefix
pub fn is_owned(widget: &Widget, metric_prefix: &str) -> bool {
    widget.properties.as_ref().is_some_and(|properties| {
        properties
            .metrics()
            .iter()
            .any(|metric| metric.metric_name().starts_with(metric_prefix))
    })
}

/// Append a vertical annotation; earlier annotations are left as they are
pub fn inject(widget: &mut Widget, label: &str, timestamp: DateTime<Utc>) {
    widget
        .properties_mut()
        .annotations_mut()
        .vertical_mut()
        .push(Annotation::new(label, timestamp));
}
