//! Binding to the system libpcre
//!
//! Loads the PCRE shared object at runtime via `libloading` and drives its
//! compile/execute/free lifecycle, so no C toolchain is required to build or
//! install this crate. Covers the most popular entry points (`pcre_version`,
//! `pcre_config`, `pcre_compile`, `pcre_exec`) plus the `pcre_fullinfo`
//! requests needed to decode named captures.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uchar, c_void};
use std::ptr::{self, NonNull};

use encoding_rs::Encoding;
use libloading::{Library, Symbol};
use thiserror::Error;

use super::consts::{
    config_kind, ConfigKind, PCRE_CONFIG_UNICODE_PROPERTIES, PCRE_CONFIG_UTF8,
    PCRE_INFO_NAMECOUNT, PCRE_INFO_NAMEENTRYSIZE, PCRE_INFO_NAMETABLE,
};
use super::document::CaptureSet;

/// Shared-object names probed when no explicit soname is configured.
/// The plain `libpcre.so` is the well-known fallback; the versioned names
/// cover systems without the dev-package symlink.
#[cfg(target_os = "macos")]
const SONAME_CANDIDATES: &[&str] = &["libpcre.dylib", "libpcre.1.dylib"];
#[cfg(windows)]
const SONAME_CANDIDATES: &[&str] = &["pcre.dll", "libpcre-1.dll"];
#[cfg(not(any(target_os = "macos", windows)))]
const SONAME_CANDIDATES: &[&str] = &["libpcre.so", "libpcre.so.3", "libpcre.so.1"];

type VersionFn = unsafe extern "C" fn() -> *const c_char;
type ConfigFn = unsafe extern "C" fn(c_int, *mut c_void) -> c_int;
type CompileFn = unsafe extern "C" fn(
    *const c_char,
    c_int,
    *mut *const c_char,
    *mut c_int,
    *const c_uchar,
) -> *mut c_void;
type ExecFn = unsafe extern "C" fn(
    *const c_void,
    *const c_void,
    *const c_char,
    c_int,
    c_int,
    c_int,
    *mut c_int,
    c_int,
) -> c_int;
type FullInfoFn = unsafe extern "C" fn(*const c_void, *const c_void, c_int, *mut c_void) -> c_int;
type FreeFn = unsafe extern "C" fn(*const c_char);

/// Errors raised by the binding.
///
/// `Load` is fatal for any caller that actually needs the engine; `Compile`
/// and `BadOption` are structured and recoverable. "No match" is never an
/// error.
#[derive(Error, Debug)]
pub enum PcreError {
    #[error("unable to load the PCRE library: {0}")]
    Load(String),

    #[error("symbol {name} not found in the PCRE library: {source}")]
    Symbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("pcre_config(): bad option {0}")]
    BadOption(i32),

    #[error("error when compiling pattern {pattern}: {message} at offset {offset}")]
    Compile {
        pattern: String,
        message: String,
        offset: i64,
    },

    #[error("{what} cannot be encoded as {encoding}")]
    Encode {
        what: &'static str,
        encoding: &'static str,
    },

    #[error("{what} is not valid {encoding}")]
    Decode {
        what: &'static str,
        encoding: &'static str,
    },
}

/// Value returned by `pcre_config()`; the variant depends on the request code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i32),
    Str(String),
}

/// Unpack a raw name table entry into an index+name pair.
///
/// The first two bytes hold the group index in big-endian order; the rest is
/// a zero-terminated name. "Names consist of up to 32 alphanumeric characters
/// and underscores." -- pcrepattern(3). Anything non-ASCII is rejected here
/// rather than decoded loosely.
pub fn nametable_entry(entry: &[u8]) -> Result<(u16, String), PcreError> {
    if entry.len() < 3 {
        return Err(PcreError::Decode {
            what: "name table entry",
            encoding: "ascii",
        });
    }
    let index = u16::from_be_bytes([entry[0], entry[1]]);
    let name_bytes = &entry[2..];
    let end = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(name_bytes.len());
    let name_bytes = &name_bytes[..end];
    if !name_bytes.is_ascii() {
        return Err(PcreError::Decode {
            what: "name table entry",
            encoding: "ascii",
        });
    }
    Ok((index, String::from_utf8_lossy(name_bytes).into_owned()))
}

/// A successfully compiled pattern.
///
/// Exclusively owns the engine-side allocation; dropping the handle frees it
/// exactly once. Handles never outlive the library that produced them.
#[derive(Debug)]
pub struct CompiledPattern<'lib> {
    code: NonNull<c_void>,
    lib: &'lib PcreLibrary,
}

impl Drop for CompiledPattern<'_> {
    fn drop(&mut self) {
        // pcre_free is exported by the shared object as a data symbol (a
        // function pointer variable), not a function; pcre_free_substring is
        // a plain function over the same allocator and exists exactly for
        // bindings like this one.
        if let Ok(free) = self
            .lib
            .symbol::<FreeFn>("pcre_free_substring")
        {
            unsafe { free(self.code.as_ptr() as *const c_char) };
        }
    }
}

/// Thin abstraction layer over the most popular libpcre functions.
///
/// The shared object is loaded lazily on first use. One instance is created
/// by the entry point and passed explicitly to every consumer; the loaded
/// library is effectively process-wide state and no internal synchronization
/// is assumed.
#[derive(Debug)]
pub struct PcreLibrary {
    soname: Option<String>,
    encode: &'static Encoding,
    decode: &'static Encoding,
    ovector_size: usize,
    lib: OnceCell<Library>,
}

impl Default for PcreLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PcreLibrary {
    /// A binding with platform auto-detection of the shared object, UTF-8
    /// in both directions and a 60-integer offset vector (up to 19 capturing
    /// groups plus the whole match).
    pub fn new() -> Self {
        PcreLibrary {
            soname: None,
            encode: encoding_rs::UTF_8,
            decode: encoding_rs::UTF_8,
            ovector_size: 60,
            lib: OnceCell::new(),
        }
    }

    /// Use an explicit shared-object name instead of auto-detection.
    pub fn with_soname(mut self, soname: impl Into<String>) -> Self {
        self.soname = Some(soname.into());
        self
    }

    /// Encoding applied to patterns and subjects before they reach the
    /// engine, and decoding applied to capture values on the way back.
    pub fn with_encodings(mut self, encode: &'static Encoding, decode: &'static Encoding) -> Self {
        self.encode = encode;
        self.decode = decode;
        self
    }

    /// Capacity of the offset vector, in integers. libpcre uses the top
    /// third as workspace, so `n` supports `n / 3 - 1` capturing groups.
    pub fn with_ovector_size(mut self, ovector_size: usize) -> Self {
        self.ovector_size = ovector_size;
        self
    }

    pub fn ovector_size(&self) -> usize {
        self.ovector_size
    }

    fn open_library(&self) -> Result<Library, PcreError> {
        let candidates: Vec<&str> = match &self.soname {
            Some(name) => vec![name.as_str()],
            None => SONAME_CANDIDATES.to_vec(),
        };
        let mut attempts = Vec::with_capacity(candidates.len());
        for name in candidates {
            match unsafe { Library::new(name) } {
                Ok(lib) => return Ok(lib),
                Err(err) => attempts.push(format!("{name}: {err}")),
            }
        }
        Err(PcreError::Load(attempts.join("; ")))
    }

    /// Load the shared object on first use; idempotent afterwards.
    fn get_lib(&self) -> Result<&Library, PcreError> {
        if let Some(lib) = self.lib.get() {
            return Ok(lib);
        }
        let lib = self.open_library()?;
        Ok(self.lib.get_or_init(|| lib))
    }

    fn symbol<T>(&self, name: &'static str) -> Result<Symbol<'_, T>, PcreError> {
        let lib = self.get_lib()?;
        unsafe { lib.get(name.as_bytes()) }.map_err(|source| PcreError::Symbol { name, source })
    }

    fn encode_text(&self, text: &str, what: &'static str) -> Result<Vec<u8>, PcreError> {
        let (bytes, _, had_errors) = self.encode.encode(text);
        if had_errors {
            return Err(PcreError::Encode {
                what,
                encoding: self.encode.name(),
            });
        }
        Ok(bytes.into_owned())
    }

    fn decode_bytes(&self, bytes: &[u8], what: &'static str) -> Result<String, PcreError> {
        let (text, had_errors) = self.decode.decode_without_bom_handling(bytes);
        if had_errors {
            return Err(PcreError::Decode {
                what,
                encoding: self.decode.name(),
            });
        }
        Ok(text.into_owned())
    }

    /// The engine's self-reported version string, e.g. `8.45 2021-06-15`.
    pub fn version(&self) -> Result<String, PcreError> {
        let version: Symbol<VersionFn> = self.symbol("pcre_version")?;
        let ptr = unsafe { version() };
        Ok(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }

    /// `pcre_config()` for an integer-valued request code.
    pub fn config_int(&self, what: i32) -> Result<i32, PcreError> {
        let config: Symbol<ConfigFn> = self.symbol("pcre_config")?;
        let mut out: c_int = 0;
        let rc = unsafe { config(what, &mut out as *mut c_int as *mut c_void) };
        if rc < 0 {
            return Err(PcreError::BadOption(what));
        }
        Ok(out)
    }

    /// `pcre_config()` for a boolean-valued request code.
    pub fn config_bool(&self, what: i32) -> Result<bool, PcreError> {
        Ok(self.config_int(what)? != 0)
    }

    /// `pcre_config()` for a string-valued request code.
    pub fn config_str(&self, what: i32) -> Result<String, PcreError> {
        let config: Symbol<ConfigFn> = self.symbol("pcre_config")?;
        let mut out: *const c_char = ptr::null();
        let rc = unsafe { config(what, &mut out as *mut *const c_char as *mut c_void) };
        if rc < 0 {
            return Err(PcreError::BadOption(what));
        }
        if out.is_null() {
            return Ok(String::new());
        }
        Ok(unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned())
    }

    /// `pcre_config()` with the result type picked from the request code.
    /// Codes unsupported by the running build raise [`PcreError::BadOption`].
    pub fn config(&self, what: i32) -> Result<ConfigValue, PcreError> {
        match config_kind(what) {
            ConfigKind::Bool => self.config_bool(what).map(ConfigValue::Bool),
            ConfigKind::Int => self.config_int(what).map(ConfigValue::Int),
            ConfigKind::Str => self.config_str(what).map(ConfigValue::Str),
        }
    }

    /// Whether the loaded build supports caseless matching for characters
    /// 128 and above, i.e. was compiled with both UTF-8 and Unicode property
    /// support.
    pub fn supports_caseless_utf8(&self) -> Result<bool, PcreError> {
        Ok(self.config_bool(PCRE_CONFIG_UTF8)?
            && self.config_bool(PCRE_CONFIG_UNICODE_PROPERTIES)?)
    }

    /// Compile a pattern with the given option bitmask.
    ///
    /// On failure, the error carries the original pattern, the engine's
    /// message and the byte offset (in encoded bytes, not characters) at
    /// which the error was detected.
    pub fn compile(&self, pattern: &str, options: u32) -> Result<CompiledPattern<'_>, PcreError> {
        let compile: Symbol<CompileFn> = self.symbol("pcre_compile")?;
        let encoded = self.encode_text(pattern, "pattern")?;
        let c_pattern = CString::new(encoded).map_err(|err| PcreError::Compile {
            pattern: pattern.to_string(),
            message: "NUL byte in pattern".to_string(),
            offset: err.nul_position() as i64,
        })?;
        let mut err: *const c_char = ptr::null();
        let mut erroffset: c_int = 0;
        let code = unsafe {
            compile(
                c_pattern.as_ptr(),
                options as c_int,
                &mut err,
                &mut erroffset,
                ptr::null(),
            )
        };
        match NonNull::new(code) {
            Some(code) => Ok(CompiledPattern { code, lib: self }),
            None => {
                let message = if err.is_null() {
                    String::new()
                } else {
                    unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
                };
                Err(PcreError::Compile {
                    pattern: pattern.to_string(),
                    message,
                    offset: erroffset as i64,
                })
            }
        }
    }

    /// Match a subject against a compiled pattern.
    ///
    /// A non-positive match count (no match, or an ovector too small to hold
    /// anything) yields `Ok(None)`, never an error.
    pub fn exec(
        &self,
        code: &CompiledPattern<'_>,
        subject: &str,
        options: u32,
    ) -> Result<Option<CaptureSet>, PcreError> {
        let exec: Symbol<ExecFn> = self.symbol("pcre_exec")?;
        let subject_bytes = self.encode_text(subject, "subject")?;
        let mut ovector = vec![0 as c_int; self.ovector_size];
        let match_count = unsafe {
            exec(
                code.code.as_ptr(),                       // code
                ptr::null(),                              // extra
                subject_bytes.as_ptr() as *const c_char,  // subject
                subject_bytes.len() as c_int,             // length
                0,                                        // startoffset
                options as c_int,                         // options
                ovector.as_mut_ptr(),                     // ovector
                self.ovector_size as c_int,               // ovecsize
            )
        };
        if match_count < 1 {
            return Ok(None);
        }
        self.get_captures(code, &subject_bytes, &ovector, match_count as usize)
            .map(Some)
    }

    /// Compile, execute once, free. Convenience compose of the full
    /// per-pattern lifecycle.
    pub fn match_one(
        &self,
        pattern: &str,
        subject: &str,
        compile_options: u32,
        exec_options: u32,
    ) -> Result<Option<CaptureSet>, PcreError> {
        let code = self.compile(pattern, compile_options)?;
        self.exec(&code, subject, exec_options)
    }

    fn fullinfo_int(&self, code: &CompiledPattern<'_>, what: i32) -> Result<i32, PcreError> {
        let fullinfo: Symbol<FullInfoFn> = self.symbol("pcre_fullinfo")?;
        let mut out: c_int = 0;
        let rc = unsafe {
            fullinfo(
                code.code.as_ptr(),
                ptr::null(),
                what,
                &mut out as *mut c_int as *mut c_void,
            )
        };
        if rc < 0 {
            return Err(PcreError::BadOption(what));
        }
        Ok(out)
    }

    /// Number of named subpatterns, which is also the number of name table
    /// entries.
    pub fn info_namecount(&self, code: &CompiledPattern<'_>) -> Result<i32, PcreError> {
        self.fullinfo_int(code, PCRE_INFO_NAMECOUNT)
    }

    /// Size in bytes of one name table entry.
    pub fn info_nameentrysize(&self, code: &CompiledPattern<'_>) -> Result<i32, PcreError> {
        self.fullinfo_int(code, PCRE_INFO_NAMEENTRYSIZE)
    }

    fn info_nametable_ptr(&self, code: &CompiledPattern<'_>) -> Result<*const u8, PcreError> {
        let fullinfo: Symbol<FullInfoFn> = self.symbol("pcre_fullinfo")?;
        let mut out: *const c_void = ptr::null();
        let rc = unsafe {
            fullinfo(
                code.code.as_ptr(),
                ptr::null(),
                PCRE_INFO_NAMETABLE,
                &mut out as *mut *const c_void as *mut c_void,
            )
        };
        if rc < 0 {
            return Err(PcreError::BadOption(PCRE_INFO_NAMETABLE));
        }
        Ok(out as *const u8)
    }

    /// The name table as index+name pairs, in engine order (alphabetical by
    /// name).
    pub fn nametable(&self, code: &CompiledPattern<'_>) -> Result<Vec<(u16, String)>, PcreError> {
        let count = self.info_namecount(code)?.max(0) as usize;
        if count == 0 {
            return Ok(Vec::new());
        }
        let entry_size = self.info_nameentrysize(code)?.max(0) as usize;
        let table = self.info_nametable_ptr(code)?;
        if table.is_null() || entry_size < 3 {
            return Ok(Vec::new());
        }
        // The table lives inside the compiled pattern, which `code` keeps
        // alive for the duration of this borrow.
        let data = unsafe { std::slice::from_raw_parts(table, count * entry_size) };
        let mut names = Vec::with_capacity(count);
        for entry in data.chunks_exact(entry_size) {
            names.push(nametable_entry(entry)?);
        }
        Ok(names)
    }

    /// The name table as a positional lookup: position `i` holds the name of
    /// numbered group `i`, or `None` if that group is unnamed. Position 0 is
    /// always `None`; the vector is sized to the highest named index plus
    /// one.
    pub fn ordered_nametable(
        &self,
        code: &CompiledPattern<'_>,
    ) -> Result<Vec<Option<String>>, PcreError> {
        let nametable = self.nametable(code)?;
        let size = nametable
            .iter()
            .map(|(index, _)| *index as usize + 1)
            .max()
            .unwrap_or(1);
        let mut ordered = vec![None; size];
        for (index, name) in nametable {
            ordered[index as usize] = Some(name);
        }
        Ok(ordered)
    }

    /// Extract one numbered capture from the encoded subject.
    fn get_capture(
        &self,
        ovector: &[c_int],
        subject_bytes: &[u8],
        index: usize,
    ) -> Result<String, PcreError> {
        let start = ovector[index * 2];
        let end = ovector[index * 2 + 1];
        // Groups that did not participate in the match report offsets of -1
        // and decode to the empty string.
        if start < 0 || end < 0 || start > end {
            return Ok(String::new());
        }
        self.decode_bytes(&subject_bytes[start as usize..end as usize], "capture")
    }

    /// Turn the raw offset vector plus the name table into numbered and
    /// named captures.
    fn get_captures(
        &self,
        code: &CompiledPattern<'_>,
        subject_bytes: &[u8],
        ovector: &[c_int],
        match_count: usize,
    ) -> Result<CaptureSet, PcreError> {
        let mut by_index = Vec::with_capacity(match_count);
        for i in 0..match_count {
            by_index.push(self.get_capture(ovector, subject_bytes, i)?);
        }
        let mut by_name = BTreeMap::new();
        for (index, name) in self.nametable(code)? {
            // Depending on which alternative matched, a name may point past
            // the populated part of the offset vector; keep the name with a
            // null value in that case.
            by_name.insert(name, by_index.get(index as usize).cloned());
        }
        Ok(CaptureSet { by_index, by_name })
    }
}
