//! Card catalog: template lookup by name and by monster type/level.
//!
//! The engine takes its catalog by injection. `CardCatalog` is the seam;
//! `CardRegistry` is the in-memory implementation. Loading templates
//! from whatever storage format a deployment uses is the caller's job.

use rustc_hash::FxHashMap;

use super::definition::CardTemplate;

/// Read-only source of card templates.
pub trait CardCatalog {
    /// Look up a template by its unique name.
    fn by_name(&self, name: &str) -> Option<&CardTemplate>;

    /// Look up the monster template of a type at a level tier.
    fn monster(&self, monster_type: &str, level: u8) -> Option<&CardTemplate>;
}

/// In-memory catalog.
///
/// ```
/// use duel_engine::cards::{CardCatalog, CardRegistry, CardTemplate};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardTemplate::monster("Apprentice Scholar", "Scholar", 1200, 1000, 1));
/// registry.register(CardTemplate::monster("Master Scholar", "Scholar", 2000, 1700, 2));
///
/// assert_eq!(registry.monster("Scholar", 2).unwrap().name, "Master Scholar");
/// assert!(registry.monster("Scholar", 3).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    templates: FxHashMap<String, CardTemplate>,
    monsters: FxHashMap<(String, u8), String>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an iterator of templates.
    pub fn from_templates(templates: impl IntoIterator<Item = CardTemplate>) -> Self {
        let mut registry = Self::new();
        for template in templates {
            registry.register(template);
        }
        registry
    }

    /// Register a template.
    ///
    /// Panics if the name is already registered. The first template
    /// registered for a (type, level) pair is the one merges produce.
    pub fn register(&mut self, template: CardTemplate) {
        if self.templates.contains_key(&template.name) {
            panic!("Card template {:?} already registered", template.name);
        }
        if let Some((monster_type, level)) = template.monster_key() {
            self.monsters
                .entry((monster_type.to_string(), level))
                .or_insert_with(|| template.name.clone());
        }
        self.templates.insert(template.name.clone(), template);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardTemplate> {
        self.templates.values()
    }
}

impl CardCatalog for CardRegistry {
    fn by_name(&self, name: &str) -> Option<&CardTemplate> {
        self.templates.get(name)
    }

    fn monster(&self, monster_type: &str, level: u8) -> Option<&CardTemplate> {
        self.monsters
            .get(&(monster_type.to_string(), level))
            .and_then(|name| self.templates.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{SpellAbility, TrapAbility};

    #[test]
    fn test_lookup_by_name() {
        let registry = CardRegistry::from_templates([
            CardTemplate::spell("Pot of Greed", SpellAbility::DrawCards),
            CardTemplate::trap("Mirror Strike", TrapAbility::ReflectAttack),
        ]);

        assert_eq!(registry.len(), 2);
        assert!(registry.by_name("Pot of Greed").is_some());
        assert!(registry.by_name("Pot of Avarice").is_none());
    }

    #[test]
    fn test_monster_index_ignores_non_monsters() {
        let registry = CardRegistry::from_templates([
            CardTemplate::monster("Imp", "Demon", 900, 600, 1),
            CardTemplate::spell("Maniac War", SpellAbility::BuffAttack),
        ]);

        assert_eq!(registry.monster("Demon", 1).unwrap().name, "Imp");
        assert!(registry.monster("Demon", 2).is_none());
    }

    #[test]
    fn test_first_registration_wins_tier() {
        let registry = CardRegistry::from_templates([
            CardTemplate::monster("Imp", "Demon", 900, 600, 1),
            CardTemplate::monster("Lesser Fiend", "Demon", 1000, 500, 1),
        ]);

        assert_eq!(registry.monster("Demon", 1).unwrap().name, "Imp");
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_name_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardTemplate::monster("Imp", "Demon", 900, 600, 1));
        registry.register(CardTemplate::monster("Imp", "Demon", 100, 100, 1));
    }
}
