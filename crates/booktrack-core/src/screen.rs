//! Top-level screens and their navigation icons

/// A top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Profile,
    Books,
}

/// Icon shown next to a screen's label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Home,
    Person,
    Book,
}

impl Screen {
    /// Every screen, in navigation order
    pub const ALL: [Screen; 3] = [Screen::Home, Screen::Profile, Screen::Books];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Profile => "Profile",
            Screen::Books => "Books",
        }
    }

    pub fn icon(self) -> Icon {
        match self {
            Screen::Home => Icon::Home,
            Screen::Profile => Icon::Person,
            Screen::Books => Icon::Book,
        }
    }
}

impl Icon {
    /// Icon name in the Ionicons set
    pub fn name(self) -> &'static str {
        match self {
            Icon::Home => "home",
            Icon::Person => "person",
            Icon::Book => "book",
        }
    }

    /// Glyph for terminal output
    pub fn glyph(self) -> char {
        match self {
            Icon::Home => '⌂',
            Icon::Person => '☺',
            Icon::Book => '▤',
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
