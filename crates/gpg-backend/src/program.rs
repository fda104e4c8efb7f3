//! Program identity dispatch table (`spec.md` §3 "GPG program types"),
//! grounded on `GPGprogramTypes[]` in `fpagpgen.c`: the binary's argv[0]
//! (or an explicit `--program` override) selects one of four back ends
//! plus the default output-subdirectory codeword it publishes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramType {
    PsMet,
    SvgMet,
    CorMet,
    TexMet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramInfo {
    /// Recognised program-name alias (case-insensitive).
    pub name: &'static str,
    pub program_type: ProgramType,
    /// Default output subdirectory codeword, e.g. `<psout>`.
    pub out_codeword: &'static str,
}

/// Mirrors `GPGprogramTypes[]`: `fpagpgen` is a historical alias for
/// `psmet`, kept for backward compatibility with existing install scripts.
pub const PROGRAM_TYPES: &[ProgramInfo] = &[
    ProgramInfo { name: "psmet", program_type: ProgramType::PsMet, out_codeword: "psout" },
    ProgramInfo { name: "svgmet", program_type: ProgramType::SvgMet, out_codeword: "svgout" },
    ProgramInfo { name: "cormet", program_type: ProgramType::CorMet, out_codeword: "corout" },
    ProgramInfo { name: "texmet", program_type: ProgramType::TexMet, out_codeword: "texout" },
    ProgramInfo { name: "fpagpgen", program_type: ProgramType::PsMet, out_codeword: "psout" },
];

/// Resolves a program-name argument (case-insensitive) to its `ProgramInfo`.
pub fn resolve_program(name: &str) -> Option<&'static ProgramInfo> {
    PROGRAM_TYPES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_aliases_case_insensitively() {
        assert_eq!(resolve_program("PSMet").unwrap().program_type, ProgramType::PsMet);
        assert_eq!(resolve_program("fpagpgen").unwrap().program_type, ProgramType::PsMet);
        assert_eq!(resolve_program("svgmet").unwrap().out_codeword, "svgout");
    }

    #[test]
    fn unknown_program_name_resolves_to_none() {
        assert!(resolve_program("nonsense").is_none());
    }
}
