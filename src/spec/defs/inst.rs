use crate::spec::{isa::Builder, types::schema::InstructionSpec};

// Memory-reference instructions: the low 12 bits of the word carry the operand address,
// and bit 15 selects indirect addressing.
fn gen_mem(builder: &mut Builder) {
    builder.register(InstructionSpec::hw(
        "AND",
        true,
        0x0000,
        "Logic AND between the operand and accumulator A",
    ));
    builder.register(InstructionSpec::hw(
        "ADD",
        true,
        0x1000,
        "Add the operand's value to accumulator A",
    ));
    builder.register(InstructionSpec::hw(
        "LDA",
        true,
        0x2000,
        "Load the operand's value into accumulator A",
    ));
    builder.register(InstructionSpec::hw(
        "STA",
        true,
        0x3000,
        "Store accumulator A at the operand address",
    ));
    builder.register(InstructionSpec::hw(
        "BIN",
        true,
        0x4000,
        "Unconditional branch to the operand address",
    ));
    builder.register(InstructionSpec::hw(
        "BSA",
        true,
        0x5000,
        "Branch to subroutine, return address stored at the operand",
    ));
    builder.register(InstructionSpec::hw(
        "ISZ",
        true,
        0x6000,
        "Increment the operand's value, skip the next instruction if zero",
    ));
}

// Register-reference instructions: one bit each in the low 12 bits under 0x7000.
fn gen_reg(builder: &mut Builder) {
    builder.register(InstructionSpec::hw("CLA", false, 0x7800, "Clear accumulator A"));
    builder.register(InstructionSpec::hw("CLE", false, 0x7400, "Clear flag E (carry out)"));
    builder.register(InstructionSpec::hw("LNA", false, 0x7200, "Logic NOT of accumulator A"));
    builder.register(InstructionSpec::hw("LNE", false, 0x7100, "Logic NOT of flag E"));
    builder.register(InstructionSpec::hw(
        "SRA",
        false,
        0x7080,
        "Shift accumulator A right through flag E",
    ));
    builder.register(InstructionSpec::hw(
        "SLA",
        false,
        0x7040,
        "Shift accumulator A left through flag E",
    ));
    builder.register(InstructionSpec::hw("INC", false, 0x7020, "Increment accumulator A"));
    builder.register(InstructionSpec::hw(
        "SPA",
        false,
        0x7010,
        "Skip the next instruction if A > 0",
    ));
    builder.register(InstructionSpec::hw(
        "SNA",
        false,
        0x7008,
        "Skip the next instruction if A < 0",
    ));
    builder.register(InstructionSpec::hw(
        "SZA",
        false,
        0x7004,
        "Skip the next instruction if A = 0",
    ));
    builder.register(InstructionSpec::hw(
        "SZE",
        false,
        0x7002,
        "Skip the next instruction if E = 0",
    ));
    builder.register(InstructionSpec::hw(
        "HLT",
        false,
        0x7001,
        "Halt until hardware reset",
    ));
}

fn gen_io(builder: &mut Builder) {
    builder.register(InstructionSpec::hw("RIR", false, 0xF800, "Read the input register"));
    builder.register(InstructionSpec::hw("WOR", false, 0xF400, "Write the output register"));
    builder.register(InstructionSpec::hw(
        "SFI",
        false,
        0xF200,
        "Skip the next instruction if input flag FGI = 1",
    ));
    builder.register(InstructionSpec::hw(
        "SFO",
        false,
        0xF100,
        "Skip the next instruction if output flag FGO = 0",
    ));
}

// NOTE `JMP` has no encoding of its own, it is emitted as a `BIN` to the label's
// program-counter index.
fn gen_pseudo(builder: &mut Builder) {
    builder.register(InstructionSpec::sw(
        "JMP",
        true,
        0x0000,
        "Jump to a label in the assembly source",
    ));
}

pub(in crate::spec) fn register(builder: &mut Builder) {
    gen_mem(builder);
    gen_reg(builder);
    gen_io(builder);
    gen_pseudo(builder);
}
