use crate::picking::PickHit;
use crate::registry::BodyRegistry;

/// Information panel about a picked body. Hidden until something is picked.
#[derive(Debug, Default)]
pub struct InfoPopup {
    text: Option<String>,
}

impl InfoPopup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn show(&mut self, hit: &PickHit, registry: &BodyRegistry) {
        let body = match registry.get(hit.body) {
            Some(body) => body,
            None => return,
        };
        let config = body.config();

        let mut text = format!(
            "{}\n    Radius: {:.2}\n    Bodies in orbit: {}",
            config.name,
            config.sphere_radius,
            registry.planets().count(),
        );
        if let Some(description) = &config.description {
            text.push_str("\n\n");
            text.push_str(description);
        }
        text.push_str("\n\n[Esc] close");

        self.text = Some(text);
    }

    pub fn hide(&mut self) {
        self.text = None;
    }
}
