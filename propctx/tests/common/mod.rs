use cranelift_entity::EntityRef;
use flowcheck_ir::{
    Block, BlockId, CallSiteRef, DefUse, InstrLoc, MethodIr, NoConstants, SymbolTable, ValueNumber,
};
use smallvec::SmallVec;

pub struct TestMethod {
    pub blocks: Vec<Block>,
    pub max_value: ValueNumber,
    pub num_params: usize,
    pub call_sites: Vec<(CallSiteRef, SmallVec<[ValueNumber; 4]>)>,
}

impl MethodIr for TestMethod {
    fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn max_value_number(&self) -> ValueNumber {
        self.max_value
    }

    fn num_parameters(&self) -> usize {
        self.num_params
    }

    fn blocks(&self) -> SmallVec<[BlockId; 16]> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    fn block(&self, id: BlockId) -> &Block {
        self.blocks.iter().find(|b| b.id == id).unwrap_or_else(|| panic!("no such block: {id:?}"))
    }

    fn symbol_table(&self) -> &dyn SymbolTable {
        &NoConstants
    }

    fn call_site_args(&self, site: CallSiteRef) -> SmallVec<[ValueNumber; 4]> {
        self.call_sites
            .iter()
            .find(|(s, _)| *s == site)
            .map(|(_, args)| args.clone())
            .unwrap_or_default()
    }
}

impl DefUse for TestMethod {
    fn defining_instruction(&self, value: ValueNumber) -> Option<InstrLoc> {
        for block in &self.blocks {
            for (index, instr) in block.instructions.iter().enumerate() {
                if instr.defined_value() == Some(value) {
                    return Some(InstrLoc::new(block.id, index));
                }
            }
        }
        None
    }

    fn uses(&self, value: ValueNumber) -> SmallVec<[InstrLoc; 8]> {
        use flowcheck_ir::Instruction::*;
        let mut result = SmallVec::new();
        for block in &self.blocks {
            for (index, instr) in block.instructions.iter().enumerate() {
                let operands: SmallVec<[ValueNumber; 4]> = match instr {
                    GetField { object, .. } => SmallVec::from_slice(&[*object]),
                    Get { object, .. } => SmallVec::from_slice(&[*object]),
                    ReflectiveGet { object, key, .. } => SmallVec::from_slice(&[*object, *key]),
                    ReflectivePut { object, key, value: v, .. } => {
                        SmallVec::from_slice(&[*object, *key, *v])
                    }
                    IsDefinedIn { object, key, .. } => SmallVec::from_slice(&[*object, *key]),
                    InvokeStatic { args, .. } => args.clone(),
                    InvokeInstance { receiver, args, .. } => {
                        let mut v = SmallVec::from_slice(&[*receiver]);
                        v.extend(args.iter().copied());
                        v
                    }
                    _ => SmallVec::new(),
                };
                if operands.contains(&value) {
                    result.push(InstrLoc::new(block.id, index));
                }
            }
        }
        result
    }
}

pub fn block_id(n: u32) -> BlockId {
    BlockId::new(n as usize)
}

pub fn value(n: u32) -> ValueNumber {
    ValueNumber::new(n as usize)
}
