//! Builtin tool catalog
//!
//! Declarative inventory of every upstream operation the gateway exposes.
//! Each entry records the HTTP method, path template, parameter schema, and
//! response kind; all request mechanics live in the binder, builder, and
//! transport. Adding an endpoint means adding one descriptor here.
//!
//! Grouped by upstream API family. Registry construction validates the whole
//! table at startup, so a malformed entry fails fast rather than at call time.

use http::Method;
use serde_json::json;

use crate::core::schema::{ParameterSpec, ResponseKind, ToolDescriptor};

/// Audio container and bitrate labels accepted by synthesis endpoints
pub const OUTPUT_FORMATS: &[&str] = &[
    "mp3_22050_32",
    "mp3_44100_32",
    "mp3_44100_64",
    "mp3_44100_96",
    "mp3_44100_128",
    "mp3_44100_192",
    "pcm_16000",
    "pcm_22050",
    "pcm_24000",
    "pcm_44100",
    "ulaw_8000",
];

pub const GENDERS: &[&str] = &["male", "female"];
pub const AGES: &[&str] = &["young", "middle_aged", "old"];
pub const TRANSCRIPT_FORMATS: &[&str] = &["srt", "webvtt"];
pub const WORKSPACE_ROLES: &[&str] = &["workspace_admin", "workspace_member"];

/// The full tool inventory, in catalog order
pub fn builtin_tools() -> Vec<ToolDescriptor> {
    let mut tools = Vec::new();
    tools.extend(history_tools());
    tools.extend(sample_tools());
    tools.extend(text_to_speech_tools());
    tools.extend(voice_generation_tools());
    tools.extend(user_tools());
    tools.extend(voice_tools());
    tools.extend(project_tools());
    tools.extend(dubbing_tools());
    tools.extend(model_tools());
    tools.extend(audio_native_tools());
    tools.extend(usage_tools());
    tools.extend(pronunciation_dictionary_tools());
    tools.extend(workspace_tools());
    tools.extend(conversational_ai_tools());
    tools
}

// ===== History =====

fn history_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_generated_items",
            Method::GET,
            "/v1/history",
            vec![
                ParameterSpec::query_integer("page_size"),
                ParameterSpec::query_string("voice_id"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_history_item_by_id",
            Method::GET,
            "/v1/history/{history_item_id}",
            vec![ParameterSpec::path("history_item_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "delete_history_item",
            Method::DELETE,
            "/v1/history/{history_item_id}",
            vec![ParameterSpec::path("history_item_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_audio_from_history_item",
            Method::GET,
            "/v1/history/{history_item_id}/audio",
            vec![ParameterSpec::path("history_item_id")],
            ResponseKind::Binary,
        ),
        ToolDescriptor::new(
            "download_history_items",
            Method::POST,
            "/v1/history/download",
            vec![ParameterSpec::body_object("history_item_ids").required()],
            ResponseKind::Binary,
        ),
    ]
}

// ===== Samples =====

fn sample_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "delete_sample",
            Method::DELETE,
            "/v1/voices/{voice_id}/samples/{sample_id}",
            vec![
                ParameterSpec::path("voice_id"),
                ParameterSpec::path("sample_id"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_audio_from_sample",
            Method::GET,
            "/v1/voices/{voice_id}/samples/{sample_id}/audio",
            vec![
                ParameterSpec::path("voice_id"),
                ParameterSpec::path("sample_id"),
            ],
            ResponseKind::Binary,
        ),
    ]
}

// ===== Text-to-speech =====

/// Shared schema for the four synthesis endpoints
fn synthesis_params() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::path("voice_id"),
        ParameterSpec::query_integer("optimize_streaming_latency"),
        ParameterSpec::query_enum("output_format", OUTPUT_FORMATS),
        ParameterSpec::body_string("text").required(),
        ParameterSpec::body_string("model_id"),
        ParameterSpec::body_object("voice_settings"),
    ]
}

fn text_to_speech_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "convert",
            Method::POST,
            "/v1/text-to-speech/{voice_id}",
            synthesis_params(),
            ResponseKind::Binary,
        ),
        ToolDescriptor::new(
            "text_to_speech_with_timestamps",
            Method::POST,
            "/v1/text-to-speech/{voice_id}/with-timestamps",
            synthesis_params(),
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "convert_as_stream",
            Method::POST,
            "/v1/text-to-speech/{voice_id}/stream",
            synthesis_params(),
            ResponseKind::StreamBinary,
        ),
        ToolDescriptor::new(
            "text_to_speech_streaming_with_timestamps",
            Method::POST,
            "/v1/text-to-speech/{voice_id}/stream/with-timestamps",
            synthesis_params(),
            ResponseKind::StreamJson,
        ),
    ]
}

// ===== Voice generation =====

fn voice_generation_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "voice_generation_parameters",
            Method::GET,
            "/v1/voice-generation/generate-voice/parameters",
            vec![],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "generate_arandom_voice",
            Method::POST,
            "/v1/voice-generation/generate-voice",
            vec![
                ParameterSpec::body_enum("gender", GENDERS).required(),
                ParameterSpec::body_string("accent").required(),
                ParameterSpec::body_enum("age", AGES).required(),
                ParameterSpec::body_string("accent_strength").required(),
                ParameterSpec::body_string("text").required(),
            ],
            ResponseKind::Binary,
        ),
        ToolDescriptor::new(
            "create_apreviously_generated_voice",
            Method::POST,
            "/v1/voice-generation/create-voice",
            vec![
                ParameterSpec::body_string("voice_name").required(),
                ParameterSpec::body_string("voice_description").required(),
                ParameterSpec::body_string("generated_voice_id").required(),
                ParameterSpec::body_object("labels"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "generate_avoice_preview_from_description",
            Method::POST,
            "/v1/text-to-voice/create-previews",
            vec![
                ParameterSpec::body_string("voice_description").required(),
                ParameterSpec::body_string("text").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "create_anew_voice_from_voice_preview",
            Method::POST,
            "/v1/text-to-voice/create-voice-from-preview",
            vec![
                ParameterSpec::body_string("voice_name").required(),
                ParameterSpec::body_string("voice_description").required(),
                ParameterSpec::body_string("generated_voice_id").required(),
                ParameterSpec::body_object("labels"),
            ],
            ResponseKind::Json,
        ),
    ]
}

// ===== User =====

fn user_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_user_subscription_info",
            Method::GET,
            "/v1/user/subscription",
            vec![],
            ResponseKind::Json,
        ),
        ToolDescriptor::new("get_user_info", Method::GET, "/v1/user", vec![], ResponseKind::Json),
    ]
}

// ===== Voices =====

fn voice_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new("get_voices", Method::GET, "/v1/voices", vec![], ResponseKind::Json),
        ToolDescriptor::new(
            "get_default_voice_settings",
            Method::GET,
            "/v1/voices/settings/default",
            vec![],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_voice_settings",
            Method::GET,
            "/v1/voices/{voice_id}/settings",
            vec![ParameterSpec::path("voice_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_voice",
            Method::GET,
            "/v1/voices/{voice_id}",
            vec![
                ParameterSpec::path("voice_id"),
                ParameterSpec::query_boolean("with_settings"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "delete_voice",
            Method::DELETE,
            "/v1/voices/{voice_id}",
            vec![ParameterSpec::path("voice_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "add_voice",
            Method::POST,
            "/v1/voices/add",
            vec![
                ParameterSpec::file("files").required(),
                ParameterSpec::body_string("name").required(),
                ParameterSpec::body_string("description"),
                ParameterSpec::body_string("labels"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "edit_voice",
            Method::POST,
            "/v1/voices/{voice_id}/edit",
            vec![
                ParameterSpec::path("voice_id"),
                ParameterSpec::file("files"),
                ParameterSpec::body_string("name").required(),
                ParameterSpec::body_string("description"),
                ParameterSpec::body_string("labels"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "add_sharing_voice",
            Method::POST,
            "/v1/voices/add/{public_user_id}/{voice_id}",
            vec![
                ParameterSpec::path("public_user_id"),
                ParameterSpec::path("voice_id"),
                ParameterSpec::body_string("new_name").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_shared_voices",
            Method::GET,
            "/v1/shared-voices",
            vec![
                ParameterSpec::query_integer("page_size"),
                ParameterSpec::query_enum("gender", GENDERS),
                ParameterSpec::query_string("language"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_aprofile_page",
            Method::GET,
            "/profile/{handle}",
            vec![ParameterSpec::path("handle")],
            ResponseKind::Json,
        ),
    ]
}

// ===== Projects =====

fn project_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_projects",
            Method::GET,
            "/v1/projects",
            vec![],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "add_project",
            Method::POST,
            "/v1/projects/add",
            vec![
                ParameterSpec::body_string("name").required(),
                ParameterSpec::body_string("default_title_voice_id").required(),
                ParameterSpec::body_string("default_paragraph_voice_id").required(),
                ParameterSpec::body_string("default_model_id").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_project_by_id",
            Method::GET,
            "/v1/projects/{project_id}",
            vec![ParameterSpec::path("project_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "edit_basic_project_info",
            Method::POST,
            "/v1/projects/{project_id}",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::body_string("name").required(),
                ParameterSpec::body_string("default_title_voice_id").required(),
                ParameterSpec::body_string("default_paragraph_voice_id").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "delete_project",
            Method::DELETE,
            "/v1/projects/{project_id}",
            vec![ParameterSpec::path("project_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "convert_project",
            Method::POST,
            "/v1/projects/{project_id}/convert",
            vec![ParameterSpec::path("project_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_project_snapshots",
            Method::GET,
            "/v1/projects/{project_id}/snapshots",
            vec![ParameterSpec::path("project_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "streams_archive_with_project_audio",
            Method::POST,
            "/v1/projects/{project_id}/snapshots/{project_snapshot_id}/archive",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::path("project_snapshot_id"),
            ],
            ResponseKind::StreamBinary,
        ),
        ToolDescriptor::new(
            "add_chapter_to_aproject",
            Method::POST,
            "/v1/projects/{project_id}/chapters/add",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::body_string("name").required(),
                ParameterSpec::body_string("from_url"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "update_pronunciation_dictionaries",
            Method::POST,
            "/v1/projects/{project_id}/update-pronunciation-dictionaries",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::body_object("pronunciation_dictionary_locators").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_chapters",
            Method::GET,
            "/v1/projects/{project_id}/chapters",
            vec![ParameterSpec::path("project_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_chapter_by_id",
            Method::GET,
            "/v1/projects/{project_id}/chapters/{chapter_id}",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::path("chapter_id"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "delete_chapter",
            Method::DELETE,
            "/v1/projects/{project_id}/chapters/{chapter_id}",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::path("chapter_id"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "convert_chapter",
            Method::POST,
            "/v1/projects/{project_id}/chapters/{chapter_id}/convert",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::path("chapter_id"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_chapter_snapshots",
            Method::GET,
            "/v1/projects/{project_id}/chapters/{chapter_id}/snapshots",
            vec![
                ParameterSpec::path("project_id"),
                ParameterSpec::path("chapter_id"),
            ],
            ResponseKind::Json,
        ),
    ]
}

// ===== Dubbing =====

fn dubbing_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "dub_avideo_or_an_audio_file",
            Method::POST,
            "/v1/dubbing",
            vec![
                ParameterSpec::file("file"),
                ParameterSpec::body_string("name"),
                ParameterSpec::body_string("source_url"),
                ParameterSpec::body_string("source_lang").with_default(json!("auto")),
                ParameterSpec::body_string("target_lang").required(),
                ParameterSpec::body_integer("num_speakers"),
                ParameterSpec::body_boolean("watermark"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_dubbing_project_metadata",
            Method::GET,
            "/v1/dubbing/{dubbing_id}",
            vec![ParameterSpec::path("dubbing_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "delete_dubbing_project",
            Method::DELETE,
            "/v1/dubbing/{dubbing_id}",
            vec![ParameterSpec::path("dubbing_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_transcript_for_dub",
            Method::GET,
            "/v1/dubbing/{dubbing_id}/transcript/{language_code}",
            vec![
                ParameterSpec::path("dubbing_id"),
                ParameterSpec::path("language_code"),
                ParameterSpec::query_enum("format_type", TRANSCRIPT_FORMATS),
            ],
            ResponseKind::Json,
        ),
    ]
}

// ===== Models =====

fn model_tools() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor::new("get_models", Method::GET, "/v1/models", vec![], ResponseKind::Json)]
}

// ===== Audio Native =====

fn audio_native_tools() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor::new(
        "creates_audionative_enabled_project",
        Method::POST,
        "/v1/audio-native",
        vec![
            ParameterSpec::file("file"),
            ParameterSpec::body_string("name").required(),
            ParameterSpec::body_string("title"),
            ParameterSpec::body_string("author"),
            ParameterSpec::body_string("voice_id"),
            ParameterSpec::body_string("model_id"),
            ParameterSpec::body_boolean("auto_convert"),
        ],
        ResponseKind::Json,
    )]
}

// ===== Usage =====

fn usage_tools() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor::new(
        "get_characters_usage_metrics",
        Method::GET,
        "/v1/usage/character-stats",
        vec![
            ParameterSpec::query_integer("start_unix").required(),
            ParameterSpec::query_integer("end_unix").required(),
        ],
        ResponseKind::Json,
    )]
}

// ===== Pronunciation dictionaries =====

fn pronunciation_dictionary_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "add_apronunciation_dictionary",
            Method::POST,
            "/v1/pronunciation-dictionaries/add-from-file",
            vec![
                ParameterSpec::file("file"),
                ParameterSpec::body_string("name").required(),
                ParameterSpec::body_string("description"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "add_rules_to_the_pronunciation_dictionary",
            Method::POST,
            "/v1/pronunciation-dictionaries/{pronunciation_dictionary_id}/add-rules",
            vec![
                ParameterSpec::path("pronunciation_dictionary_id"),
                ParameterSpec::body_object("rules").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "remove_rules_from_the_pronunciation_dictionary",
            Method::POST,
            "/v1/pronunciation-dictionaries/{pronunciation_dictionary_id}/remove-rules",
            vec![
                ParameterSpec::path("pronunciation_dictionary_id"),
                ParameterSpec::body_object("rule_strings").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_pls_file_with_apronunciation_dictionary_version_rules",
            Method::GET,
            "/v1/pronunciation-dictionaries/{dictionary_id}/{version_id}/download",
            vec![
                ParameterSpec::path("dictionary_id"),
                ParameterSpec::path("version_id"),
            ],
            ResponseKind::Binary,
        ),
        ToolDescriptor::new(
            "get_metadata_for_apronunciation_dictionary",
            Method::GET,
            "/v1/pronunciation-dictionaries/{pronunciation_dictionary_id}",
            vec![ParameterSpec::path("pronunciation_dictionary_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_pronunciation_dictionaries",
            Method::GET,
            "/v1/pronunciation-dictionaries",
            vec![
                ParameterSpec::query_string("cursor"),
                ParameterSpec::query_integer("page_size"),
            ],
            ResponseKind::Json,
        ),
    ]
}

// ===== Workspace =====

fn workspace_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "invite_user",
            Method::POST,
            "/v1/workspace/invites/add",
            vec![ParameterSpec::body_string("email").required()],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "delete_existing_invitation",
            Method::DELETE,
            "/v1/workspace/invites",
            vec![ParameterSpec::body_string("email").required()],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "update_member",
            Method::POST,
            "/v1/workspace/members",
            vec![
                ParameterSpec::body_string("email").required(),
                ParameterSpec::body_boolean("is_locked"),
                ParameterSpec::body_enum("workspace_role", WORKSPACE_ROLES),
            ],
            ResponseKind::Json,
        ),
    ]
}

// ===== Conversational AI =====

fn conversational_ai_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_signed_url",
            Method::GET,
            "/v1/convai/conversation/get_signed_url",
            vec![ParameterSpec::query_string("agent_id").required()],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "create_agent",
            Method::POST,
            "/v1/convai/agents/create",
            vec![
                ParameterSpec::body_object("conversation_config").required(),
                ParameterSpec::body_object("platform_settings"),
                ParameterSpec::body_string("name"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_agent",
            Method::GET,
            "/v1/convai/agents/{agent_id}",
            vec![ParameterSpec::path("agent_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "delete_agent",
            Method::DELETE,
            "/v1/convai/agents/{agent_id}",
            vec![ParameterSpec::path("agent_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_agent_widget_config",
            Method::GET,
            "/v1/convai/agents/{agent_id}/widget",
            vec![ParameterSpec::path("agent_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_shareable_agent_link",
            Method::GET,
            "/v1/convai/agents/{agent_id}/link",
            vec![ParameterSpec::path("agent_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_documentation_from_agent_sknowledge_base",
            Method::GET,
            "/v1/convai/agents/{agent_id}/knowledge-base/{documentation_id}",
            vec![
                ParameterSpec::path("agent_id"),
                ParameterSpec::path("documentation_id"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "add_asecret_to_the_agent_which_can_be_referenced_in_tool_calls",
            Method::POST,
            "/v1/convai/agents/{agent_id}/add-secret",
            vec![
                ParameterSpec::path("agent_id"),
                ParameterSpec::body_string("name").required(),
                ParameterSpec::body_string("secret_value").required(),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_agents_page",
            Method::GET,
            "/v1/convai/agents",
            vec![
                ParameterSpec::query_string("cursor"),
                ParameterSpec::query_integer("page_size"),
                ParameterSpec::query_string("search"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_conversations",
            Method::GET,
            "/v1/convai/conversations",
            vec![
                ParameterSpec::query_string("agent_id"),
                ParameterSpec::query_string("cursor"),
                ParameterSpec::query_integer("page_size"),
            ],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_conversation_details",
            Method::GET,
            "/v1/convai/conversations/{conversation_id}",
            vec![ParameterSpec::path("conversation_id")],
            ResponseKind::Json,
        ),
        ToolDescriptor::new(
            "get_conversation_audio",
            Method::GET,
            "/v1/convai/conversations/{conversation_id}/audio",
            vec![ParameterSpec::path("conversation_id")],
            ResponseKind::Binary,
        ),
    ]
}
