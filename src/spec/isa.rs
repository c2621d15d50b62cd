use super::defs;
use super::types::{
    hw::Word,
    schema::{InstClass, InstructionSpec},
};
use crate::common;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static STORAGE: Lazy<InstructionSet> = Lazy::new(InstructionSet::new);

pub const JUMP_MNEMONIC: &str = "JMP";
pub const BRANCH_MNEMONIC: &str = "BIN";

pub struct InstructionSet {
    specs: Vec<InstructionSpec>,
    by_name: HashMap<&'static str, usize>,
}

impl InstructionSet {
    fn new() -> Self {
        let mut builder = Builder::new();
        defs::inst::register(&mut builder);
        builder.build()
    }

    pub fn get() -> &'static InstructionSet {
        Lazy::force(&STORAGE)
    }

    // Names are matched exactly, callers hand us already-uppercased source.
    pub fn lookup(&self, name: &str) -> Option<&InstructionSpec> {
        self.by_name.get(name).map(|&idx| &self.specs[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The specs in table order.
    pub fn iter(&self) -> impl Iterator<Item = &InstructionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The base opcode which `JMP` lines are emitted as.
    pub fn branch_opcode(&self) -> Word {
        // The table always registers the branch instruction.
        self.lookup(BRANCH_MNEMONIC)
            .expect("instruction table is missing the branch instruction")
            .opcode
    }
}

pub struct Builder {
    isa: InstructionSet,
}

impl Builder {
    fn new() -> Self {
        Builder {
            isa: InstructionSet {
                specs: Vec::new(),
                by_name: HashMap::new(),
            },
        }
    }

    fn build(self) -> InstructionSet {
        assert!(self.isa.contains(BRANCH_MNEMONIC));
        assert!(self.isa.contains(JUMP_MNEMONIC));

        // Pseudo-instructions are never decoded, so only hardware opcodes must be unique.
        let hw: Vec<_> = self
            .isa
            .iter()
            .filter(|spec| spec.class == InstClass::Hardware)
            .collect();
        for (a, b) in common::slice_pairwise_ordered(&hw) {
            assert_ne!(a.opcode, b.opcode, "{} and {} share an opcode", a.name, b.name);
        }

        self.isa
    }

    pub(super) fn register(&mut self, spec: InstructionSpec) {
        let idx = self.isa.specs.len();
        assert!(self.isa.by_name.insert(spec.name, idx).is_none());
        self.isa.specs.push(spec);
    }
}
