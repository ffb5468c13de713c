//! Parser configuration: denylists, annotation names and warning switches.
//!
//! `ParserConfig::default()` carries the lists needed for the Steamworks SDK
//! headers. A JSON file can override any subset of the fields.

use serde::Deserialize;
use std::collections::BTreeMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Header file names never parsed
    pub skipped_files: Vec<String>,
    /// A line containing any of these substrings is dropped
    pub skipped_lines: Vec<String>,
    /// Structs whose layout is defined elsewhere; bodies are not parsed
    pub skipped_structs: Vec<String>,
    /// Line prefixes that annotate the following function
    pub function_attributes: Vec<String>,
    /// Token prefixes that annotate the following argument
    pub arg_attributes: Vec<String>,
    /// Files whose interfaces get a game-server clone
    pub gameserver_files: Vec<String>,
    /// Suffixes used to disambiguate overloaded functions, keyed by arg type
    pub type_names: BTreeMap<String, String>,
    /// Conditional whose guarded regions are excluded entirely
    pub gate_condition: String,
    /// `class <prefix>...` opens an interface
    pub interface_prefix: String,
    /// Wrapper macro marking a private entry point
    pub private_wrapper: String,
    pub warn_utf8bom: bool,
    pub warn_include_guard: bool,
    pub warn_spacing: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            skipped_files: strings(&[
                "steam_api_flat.h",
                "isteamps3overlayrenderer.h",
                "steamps3params.h",
                "isteamcontroller.h",
                "isteamdualsense.h",
            ]),
            skipped_lines: strings(&[
                "STEAM_CLANG_ATTR",
                "#define VALVE_BIG_ENDIAN",
                "public:",
                "private:",
                "protected:",
                "_STEAM_CALLBACK_",
                "#define STEAM_CALLBACK_BEGIN",
                "#define STEAM_CALLBACK_END",
                "#define STEAM_CALLBACK_MEMBER",
                "STEAM_DEFINE_INTERFACE_ACCESSOR",
            ]),
            skipped_structs: strings(&[
                "SteamNetworkingIPAddr",
                "SteamNetworkingIdentity",
                "SteamNetworkingMessage_t",
                "SteamNetworkingConfigValue_t",
                "SteamDatagramHostedAddress",
                "SteamDatagramRelayAuthTicket",
            ]),
            function_attributes: strings(&[
                "STEAM_METHOD_DESC",
                "STEAM_IGNOREATTR",
                "STEAM_CALL_RESULT",
                "STEAM_CALL_BACK",
                "STEAM_FLAT_NAME",
            ]),
            arg_attributes: strings(&[
                "STEAM_ARRAY_COUNT",
                "STEAM_ARRAY_COUNT_D",
                "STEAM_BUFFER_COUNT",
                "STEAM_DESC",
                "STEAM_OUT_ARRAY_CALL",
                "STEAM_OUT_ARRAY_COUNT",
                "STEAM_OUT_BUFFER_COUNT",
                "STEAM_OUT_STRING",
                "STEAM_OUT_STRING_COUNT",
                "STEAM_OUT_STRUCT",
            ]),
            gameserver_files: strings(&[
                "isteamclient.h",
                "isteamhttp.h",
                "isteaminventory.h",
                "isteamnetworking.h",
                "isteamnetworkingmessages.h",
                "isteamnetworkingsockets.h",
                "isteamnetworkingutils.h",
                "isteamugc.h",
                "isteamutils.h",
            ]),
            type_names: [
                ("bool", "bool"),
                ("const char *", "string"),
                ("double *", "doublePtr"),
                ("float *", "floatPtr"),
                ("float", "float"),
                ("int32 *", "int32Ptr"),
                ("int32", "int32"),
                ("int64 *", "int64Ptr"),
                ("int64", "int64"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            gate_condition: "!defined(API_GEN)".to_string(),
            interface_prefix: "ISteam".to_string(),
            private_wrapper: "STEAM_PRIVATE_API".to_string(),
            warn_utf8bom: false,
            warn_include_guard: false,
            warn_spacing: false,
        }
    }
}

impl ParserConfig {
    pub fn is_skipped_file(&self, name: &str) -> bool {
        self.skipped_files.iter().any(|f| f == name)
    }

    pub fn is_skipped_struct(&self, name: &str) -> bool {
        self.skipped_structs.iter().any(|s| s == name)
    }

    pub fn has_skipped_line(&self, line: &str) -> bool {
        self.skipped_lines.iter().any(|s| line.contains(s.as_str()))
    }

    /// The argument attribute a token starts with, if any.
    pub fn arg_attribute_prefix(&self, token: &str) -> Option<&str> {
        self.arg_attributes
            .iter()
            .find(|a| token.starts_with(a.as_str()))
            .map(String::as_str)
    }

    pub fn is_function_attribute(&self, line: &str) -> bool {
        self.function_attributes
            .iter()
            .any(|a| line.starts_with(a.as_str()))
    }

    /// Suffix for an overloaded function whose distinguishing arg has type `ty`.
    pub fn overload_suffix(&self, ty: &str) -> String {
        match self.type_names.get(ty) {
            Some(name) => name.clone(),
            None => ty
                .trim()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect(),
        }
    }
}
