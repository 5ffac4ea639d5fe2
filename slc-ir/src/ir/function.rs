//! Function definitions and verification
//!
//! Defines IR functions with their signature, linkage and basic blocks.

use crate::ir::{BasicBlock, Instruction, IrError, IrType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a function is an external declaration or has a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Linkage {
    /// External symbol, no body
    Declaration,
    /// Externally visible definition with basic blocks
    Definition,
}

/// Function in IR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Unique key within the owning module
    pub name: String,
    /// Signature; must be an [`IrType::Function`]
    pub ty: IrType,
    pub linkage: Linkage,
    /// Ordered blocks; the first one is the entry block
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    /// Create an external declaration (no body)
    pub fn declaration(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
            linkage: Linkage::Declaration,
            blocks: Vec::new(),
        }
    }

    /// Create a definition with an empty body
    pub fn definition(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
            linkage: Linkage::Definition,
            blocks: Vec::new(),
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.linkage == Linkage::Declaration
    }

    /// Decompose the signature into (return type, parameter types, vararg).
    ///
    /// Returns `None` when `ty` is not a function type; verification
    /// rejects such functions.
    pub fn signature(&self) -> Option<(&IrType, &[IrType], bool)> {
        match &self.ty {
            IrType::Function {
                return_type,
                param_types,
                is_vararg,
            } => Some((return_type.as_ref(), param_types.as_slice(), *is_vararg)),
            _ => None,
        }
    }

    /// Append a block; the first block appended becomes the entry block
    pub fn add_block(&mut self, label: &str) -> Result<(), IrError> {
        if self.get_block(label).is_some() {
            return Err(IrError::structural(
                &self.name,
                format!("duplicate basic block label '{label}'"),
            ));
        }
        self.blocks.push(BasicBlock::new(label));
        Ok(())
    }

    pub fn get_block(&self, label: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.label == label)
    }

    pub fn get_block_mut(&mut self, label: &str) -> Option<&mut BasicBlock> {
        self.blocks.iter_mut().find(|b| b.label == label)
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    /// Check the structural invariants of this function.
    ///
    /// A declaration must have no body. A definition must have at least
    /// one block, every block must end in exactly one terminator which is
    /// its last instruction, and branch targets must name blocks of this
    /// function.
    pub fn verify(&self) -> Result<(), IrError> {
        if self.signature().is_none() {
            return Err(IrError::structural(
                &self.name,
                format!("'{}' is not a function type", self.ty),
            ));
        }

        for (i, block) in self.blocks.iter().enumerate() {
            if self.blocks[..i].iter().any(|b| b.label == block.label) {
                return Err(IrError::structural(
                    &self.name,
                    format!("duplicate basic block label '{}'", block.label),
                ));
            }
        }

        match self.linkage {
            Linkage::Declaration => {
                if !self.blocks.is_empty() {
                    return Err(IrError::structural(
                        &self.name,
                        "declaration must not have a body",
                    ));
                }
            }
            Linkage::Definition => {
                if self.blocks.is_empty() {
                    return Err(IrError::structural(
                        &self.name,
                        "definition has no basic blocks",
                    ));
                }
                for block in &self.blocks {
                    self.verify_block(block)?;
                }
            }
        }

        Ok(())
    }

    fn verify_block(&self, block: &BasicBlock) -> Result<(), IrError> {
        let Some(last) = block.instructions.last() else {
            return Err(IrError::structural(
                &self.name,
                format!("block '{}' is empty", block.label),
            ));
        };
        if !last.is_terminator() {
            return Err(IrError::structural(
                &self.name,
                format!("block '{}' does not end in a terminator", block.label),
            ));
        }
        for instr in &block.instructions[..block.instructions.len() - 1] {
            if instr.is_terminator() {
                return Err(IrError::structural(
                    &self.name,
                    format!(
                        "terminator before the end of block '{}'",
                        block.label
                    ),
                ));
            }
        }
        for instr in &block.instructions {
            if let Instruction::Branch(target) = instr {
                if self.get_block(target).is_none() {
                    return Err(IrError::structural(
                        &self.name,
                        format!(
                            "branch in block '{}' targets unknown block '{target}'",
                            block.label
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (return_type, param_types, is_vararg) = match self.signature() {
            Some(sig) => sig,
            None => return write!(f, "; malformed function @{}", self.name),
        };
        let keyword = match self.linkage {
            Linkage::Declaration => "declare",
            Linkage::Definition => "define",
        };
        write!(f, "{keyword} {return_type} @{}(", self.name)?;
        for (i, param) in param_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        if is_vararg {
            if !param_types.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, ")")?;
        if self.is_declaration() {
            return Ok(());
        }
        writeln!(f, " {{")?;
        for block in &self.blocks {
            writeln!(f, "{}:", block.label)?;
            for instr in &block.instructions {
                writeln!(f, "  {instr}")?;
            }
        }
        write!(f, "}}")
    }
}
