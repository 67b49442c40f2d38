//! Card system: templates, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `CardTemplate`: Static card data supplied by the catalog
//! - `SpellAbility` / `TrapAbility`: Closed sets of ability tags
//! - `Card`: Runtime card (owner, placement, combat state)
//! - `CardBody`: Monster, spell or trap payload
//! - `CardCatalog`: Injected template source; `CardRegistry` implements it

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardTemplate, SpellAbility, TemplateKind, TrapAbility, TrapTrigger, UnknownAbility};
pub use instance::{Card, CardBody, CardKind, Mode, MonsterStats, TrapState};
pub use registry::{CardCatalog, CardRegistry};
