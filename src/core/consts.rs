//! PCRE constants from `<pcre.h>`
//!
//! Option bits, `PCRE_INFO_*` codes and `PCRE_CONFIG_*` codes, plus the
//! static name lookup backing the option normaliser.

// Compile and execute option bits, (almost) straight from pcre.h.
// Several bits are shared between unrelated options; the aliases are kept
// so that every spelling accepted by the C headers resolves here too.
pub const PCRE_CASELESS: u32 = 0x0000_0001; // (?i)
pub const PCRE_MULTILINE: u32 = 0x0000_0002; // (?m)
pub const PCRE_DOTALL: u32 = 0x0000_0004; // (?s)
pub const PCRE_EXTENDED: u32 = 0x0000_0008; // (?x)
pub const PCRE_ANCHORED: u32 = 0x0000_0010; // \A
pub const PCRE_DOLLAR_ENDONLY: u32 = 0x0000_0020;
pub const PCRE_EXTRA: u32 = 0x0000_0040; // (?X)
pub const PCRE_NOTBOL: u32 = 0x0000_0080;
pub const PCRE_NOTEOL: u32 = 0x0000_0100;
pub const PCRE_UNGREEDY: u32 = 0x0000_0200; // (?U)
pub const PCRE_NOTEMPTY: u32 = 0x0000_0400;
pub const PCRE_UTF8: u32 = 0x0000_0800; // (*UTF8)
pub const PCRE_UTF16: u32 = 0x0000_0800;
pub const PCRE_UTF32: u32 = 0x0000_0800;
pub const PCRE_NO_AUTO_CAPTURE: u32 = 0x0000_1000;
pub const PCRE_NO_UTF8_CHECK: u32 = 0x0000_2000;
pub const PCRE_NO_UTF16_CHECK: u32 = 0x0000_2000;
pub const PCRE_NO_UTF32_CHECK: u32 = 0x0000_2000;
pub const PCRE_AUTO_CALLOUT: u32 = 0x0000_4000;
pub const PCRE_PARTIAL_SOFT: u32 = 0x0000_8000;
pub const PCRE_PARTIAL: u32 = 0x0000_8000;
pub const PCRE_NEVER_UTF: u32 = 0x0001_0000;
pub const PCRE_DFA_SHORTEST: u32 = 0x0001_0000;
pub const PCRE_NO_AUTO_POSSESS: u32 = 0x0002_0000; // (*NO_AUTO_POSSESS)
pub const PCRE_DFA_RESTART: u32 = 0x0002_0000;
pub const PCRE_FIRSTLINE: u32 = 0x0004_0000;
pub const PCRE_DUPNAMES: u32 = 0x0008_0000; // (?J)
pub const PCRE_NEWLINE_CR: u32 = 0x0010_0000; // (*CR)
pub const PCRE_NEWLINE_LF: u32 = 0x0020_0000; // (*LF)
pub const PCRE_NEWLINE_CRLF: u32 = 0x0030_0000; // (*CRLF)
pub const PCRE_NEWLINE_ANY: u32 = 0x0040_0000; // (*ANY)
pub const PCRE_NEWLINE_ANYCRLF: u32 = 0x0050_0000; // (*ANYCRLF)
pub const PCRE_BSR_ANYCRLF: u32 = 0x0080_0000; // (*BSR_ANYCRLF)
pub const PCRE_BSR_UNICODE: u32 = 0x0100_0000; // (*BSR_UNICODE)
pub const PCRE_JAVASCRIPT_COMPAT: u32 = 0x0200_0000;
pub const PCRE_NO_START_OPTIMIZE: u32 = 0x0400_0000; // (*NO_START_OPT)
pub const PCRE_NO_START_OPTIMISE: u32 = 0x0400_0000;
pub const PCRE_PARTIAL_HARD: u32 = 0x0800_0000;
pub const PCRE_NOTEMPTY_ATSTART: u32 = 0x1000_0000;
pub const PCRE_UCP: u32 = 0x2000_0000; // (*UCP)

// pcre_fullinfo() request codes.
pub const PCRE_INFO_OPTIONS: i32 = 0;
pub const PCRE_INFO_SIZE: i32 = 1;
pub const PCRE_INFO_CAPTURECOUNT: i32 = 2;
pub const PCRE_INFO_BACKREFMAX: i32 = 3;
pub const PCRE_INFO_FIRSTBYTE: i32 = 4;
pub const PCRE_INFO_FIRSTCHAR: i32 = 4;
pub const PCRE_INFO_FIRSTTABLE: i32 = 5;
pub const PCRE_INFO_LASTLITERAL: i32 = 6;
pub const PCRE_INFO_NAMEENTRYSIZE: i32 = 7;
pub const PCRE_INFO_NAMECOUNT: i32 = 8;
pub const PCRE_INFO_NAMETABLE: i32 = 9;
pub const PCRE_INFO_STUDYSIZE: i32 = 10;
pub const PCRE_INFO_DEFAULT_TABLES: i32 = 11;
pub const PCRE_INFO_OKPARTIAL: i32 = 12;
pub const PCRE_INFO_JCHANGED: i32 = 13;
pub const PCRE_INFO_HASCRORLF: i32 = 14;
pub const PCRE_INFO_MINLENGTH: i32 = 15;
pub const PCRE_INFO_JIT: i32 = 16;
pub const PCRE_INFO_JITSIZE: i32 = 17;
pub const PCRE_INFO_MAXLOOKBEHIND: i32 = 18;
pub const PCRE_INFO_FIRSTCHARACTER: i32 = 19;
pub const PCRE_INFO_FIRSTCHARACTERFLAGS: i32 = 20;
pub const PCRE_INFO_REQUIREDCHAR: i32 = 21;
pub const PCRE_INFO_REQUIREDCHARFLAGS: i32 = 22;

// pcre_config() request codes.
pub const PCRE_CONFIG_UTF8: i32 = 0;
pub const PCRE_CONFIG_NEWLINE: i32 = 1;
pub const PCRE_CONFIG_LINK_SIZE: i32 = 2;
pub const PCRE_CONFIG_POSIX_MALLOC_THRESHOLD: i32 = 3;
pub const PCRE_CONFIG_MATCH_LIMIT: i32 = 4;
pub const PCRE_CONFIG_STACKRECURSE: i32 = 5;
pub const PCRE_CONFIG_UNICODE_PROPERTIES: i32 = 6;
pub const PCRE_CONFIG_MATCH_LIMIT_RECURSION: i32 = 7;
pub const PCRE_CONFIG_BSR: i32 = 8;
pub const PCRE_CONFIG_JIT: i32 = 9;
pub const PCRE_CONFIG_UTF16: i32 = 10;
pub const PCRE_CONFIG_JITTARGET: i32 = 11;
pub const PCRE_CONFIG_UTF32: i32 = 12;
pub const PCRE_CONFIG_PARENS_LIMIT: i32 = 13;

/// Result type reported by `pcre_config()` for a given request code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Bool,
    Int,
    Str,
}

/// Expected output type of `pcre_config()` per request code.
/// Unknown codes are assumed to yield an integer.
pub fn config_kind(code: i32) -> ConfigKind {
    match code {
        PCRE_CONFIG_UTF8
        | PCRE_CONFIG_STACKRECURSE
        | PCRE_CONFIG_UNICODE_PROPERTIES
        | PCRE_CONFIG_JIT
        | PCRE_CONFIG_UTF16
        | PCRE_CONFIG_UTF32 => ConfigKind::Bool,
        PCRE_CONFIG_JITTARGET => ConfigKind::Str,
        _ => ConfigKind::Int,
    }
}

/// Look up a `PCRE_*` constant by its exact canonical name.
///
/// Covers option bits as well as info and config request codes, so any
/// constant defined in this module can be named in a document. Returns
/// `None` for unknown names; callers decide whether that is worth a warning.
pub fn constant(name: &str) -> Option<u32> {
    let value = match name {
        "PCRE_CASELESS" => PCRE_CASELESS,
        "PCRE_MULTILINE" => PCRE_MULTILINE,
        "PCRE_DOTALL" => PCRE_DOTALL,
        "PCRE_EXTENDED" => PCRE_EXTENDED,
        "PCRE_ANCHORED" => PCRE_ANCHORED,
        "PCRE_DOLLAR_ENDONLY" => PCRE_DOLLAR_ENDONLY,
        "PCRE_EXTRA" => PCRE_EXTRA,
        "PCRE_NOTBOL" => PCRE_NOTBOL,
        "PCRE_NOTEOL" => PCRE_NOTEOL,
        "PCRE_UNGREEDY" => PCRE_UNGREEDY,
        "PCRE_NOTEMPTY" => PCRE_NOTEMPTY,
        "PCRE_UTF8" => PCRE_UTF8,
        "PCRE_UTF16" => PCRE_UTF16,
        "PCRE_UTF32" => PCRE_UTF32,
        "PCRE_NO_AUTO_CAPTURE" => PCRE_NO_AUTO_CAPTURE,
        "PCRE_NO_UTF8_CHECK" => PCRE_NO_UTF8_CHECK,
        "PCRE_NO_UTF16_CHECK" => PCRE_NO_UTF16_CHECK,
        "PCRE_NO_UTF32_CHECK" => PCRE_NO_UTF32_CHECK,
        "PCRE_AUTO_CALLOUT" => PCRE_AUTO_CALLOUT,
        "PCRE_PARTIAL_SOFT" => PCRE_PARTIAL_SOFT,
        "PCRE_PARTIAL" => PCRE_PARTIAL,
        "PCRE_NEVER_UTF" => PCRE_NEVER_UTF,
        "PCRE_DFA_SHORTEST" => PCRE_DFA_SHORTEST,
        "PCRE_NO_AUTO_POSSESS" => PCRE_NO_AUTO_POSSESS,
        "PCRE_DFA_RESTART" => PCRE_DFA_RESTART,
        "PCRE_FIRSTLINE" => PCRE_FIRSTLINE,
        "PCRE_DUPNAMES" => PCRE_DUPNAMES,
        "PCRE_NEWLINE_CR" => PCRE_NEWLINE_CR,
        "PCRE_NEWLINE_LF" => PCRE_NEWLINE_LF,
        "PCRE_NEWLINE_CRLF" => PCRE_NEWLINE_CRLF,
        "PCRE_NEWLINE_ANY" => PCRE_NEWLINE_ANY,
        "PCRE_NEWLINE_ANYCRLF" => PCRE_NEWLINE_ANYCRLF,
        "PCRE_BSR_ANYCRLF" => PCRE_BSR_ANYCRLF,
        "PCRE_BSR_UNICODE" => PCRE_BSR_UNICODE,
        "PCRE_JAVASCRIPT_COMPAT" => PCRE_JAVASCRIPT_COMPAT,
        "PCRE_NO_START_OPTIMIZE" => PCRE_NO_START_OPTIMIZE,
        "PCRE_NO_START_OPTIMISE" => PCRE_NO_START_OPTIMISE,
        "PCRE_PARTIAL_HARD" => PCRE_PARTIAL_HARD,
        "PCRE_NOTEMPTY_ATSTART" => PCRE_NOTEMPTY_ATSTART,
        "PCRE_UCP" => PCRE_UCP,
        "PCRE_INFO_OPTIONS" => PCRE_INFO_OPTIONS as u32,
        "PCRE_INFO_SIZE" => PCRE_INFO_SIZE as u32,
        "PCRE_INFO_CAPTURECOUNT" => PCRE_INFO_CAPTURECOUNT as u32,
        "PCRE_INFO_BACKREFMAX" => PCRE_INFO_BACKREFMAX as u32,
        "PCRE_INFO_FIRSTBYTE" => PCRE_INFO_FIRSTBYTE as u32,
        "PCRE_INFO_FIRSTCHAR" => PCRE_INFO_FIRSTCHAR as u32,
        "PCRE_INFO_FIRSTTABLE" => PCRE_INFO_FIRSTTABLE as u32,
        "PCRE_INFO_LASTLITERAL" => PCRE_INFO_LASTLITERAL as u32,
        "PCRE_INFO_NAMEENTRYSIZE" => PCRE_INFO_NAMEENTRYSIZE as u32,
        "PCRE_INFO_NAMECOUNT" => PCRE_INFO_NAMECOUNT as u32,
        "PCRE_INFO_NAMETABLE" => PCRE_INFO_NAMETABLE as u32,
        "PCRE_INFO_STUDYSIZE" => PCRE_INFO_STUDYSIZE as u32,
        "PCRE_INFO_DEFAULT_TABLES" => PCRE_INFO_DEFAULT_TABLES as u32,
        "PCRE_INFO_OKPARTIAL" => PCRE_INFO_OKPARTIAL as u32,
        "PCRE_INFO_JCHANGED" => PCRE_INFO_JCHANGED as u32,
        "PCRE_INFO_HASCRORLF" => PCRE_INFO_HASCRORLF as u32,
        "PCRE_INFO_MINLENGTH" => PCRE_INFO_MINLENGTH as u32,
        "PCRE_INFO_JIT" => PCRE_INFO_JIT as u32,
        "PCRE_INFO_JITSIZE" => PCRE_INFO_JITSIZE as u32,
        "PCRE_INFO_MAXLOOKBEHIND" => PCRE_INFO_MAXLOOKBEHIND as u32,
        "PCRE_INFO_FIRSTCHARACTER" => PCRE_INFO_FIRSTCHARACTER as u32,
        "PCRE_INFO_FIRSTCHARACTERFLAGS" => PCRE_INFO_FIRSTCHARACTERFLAGS as u32,
        "PCRE_INFO_REQUIREDCHAR" => PCRE_INFO_REQUIREDCHAR as u32,
        "PCRE_INFO_REQUIREDCHARFLAGS" => PCRE_INFO_REQUIREDCHARFLAGS as u32,
        "PCRE_CONFIG_UTF8" => PCRE_CONFIG_UTF8 as u32,
        "PCRE_CONFIG_NEWLINE" => PCRE_CONFIG_NEWLINE as u32,
        "PCRE_CONFIG_LINK_SIZE" => PCRE_CONFIG_LINK_SIZE as u32,
        "PCRE_CONFIG_POSIX_MALLOC_THRESHOLD" => PCRE_CONFIG_POSIX_MALLOC_THRESHOLD as u32,
        "PCRE_CONFIG_MATCH_LIMIT" => PCRE_CONFIG_MATCH_LIMIT as u32,
        "PCRE_CONFIG_STACKRECURSE" => PCRE_CONFIG_STACKRECURSE as u32,
        "PCRE_CONFIG_UNICODE_PROPERTIES" => PCRE_CONFIG_UNICODE_PROPERTIES as u32,
        "PCRE_CONFIG_MATCH_LIMIT_RECURSION" => PCRE_CONFIG_MATCH_LIMIT_RECURSION as u32,
        "PCRE_CONFIG_BSR" => PCRE_CONFIG_BSR as u32,
        "PCRE_CONFIG_JIT" => PCRE_CONFIG_JIT as u32,
        "PCRE_CONFIG_UTF16" => PCRE_CONFIG_UTF16 as u32,
        "PCRE_CONFIG_JITTARGET" => PCRE_CONFIG_JITTARGET as u32,
        "PCRE_CONFIG_UTF32" => PCRE_CONFIG_UTF32 as u32,
        "PCRE_CONFIG_PARENS_LIMIT" => PCRE_CONFIG_PARENS_LIMIT as u32,
        _ => return None,
    };
    Some(value)
}
