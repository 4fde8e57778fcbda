// src/engine/boot.rs
use std::rc::Rc;

use crate::{
    assets::ItemTable,
    config::{self, ConfigStore},
    disk::{Disk, GameBuild},
    errors::SkyError,
    input::EventSource,
    language::{self, Language, LanguageCode},
    locator::{self, ResolvedBlock},
    subsystems::{
        BootContext, Compact, Control, Intro, Logic, Mouse, MusicDevice, MusicDriver,
        MusicDriverKind, Platform, Screen, Shared, Sound, SubsystemFactory, Text,
    },
};
use super::{
    dispatch::PendingInput,
    system_vars::{FastMode, SystemFlags, SystemVars, DEFAULT_GAME_SPEED},
    SkyEngine,
};

const VIRGIN_PALETTE: u16 = 60111;
const VIRGIN_SCREEN: u16 = 60110;
const CHINESE_EXECUTABLE: &str = "sky.exe";

/// Every subsystem the engine owns. Fields drop top to bottom, which is
/// the reverse of construction order.
pub struct Subsystems {
    pub control: Shared<dyn Control>,
    pub logic: Shared<dyn Logic>,
    pub screen: Box<dyn Screen>,
    pub mouse: Box<dyn Mouse>,
    pub text: Box<dyn Text>,
    pub compact: Box<dyn Compact>,
    pub music: Box<dyn MusicDriver>,
    pub sound: Box<dyn Sound>,
    pub disk: Box<dyn Disk>,
}

/// Roland hardware gets the MT-32 driver, as does a General MIDI device
/// when the user asks for native MT-32 output.
pub fn select_music_driver(
    device: MusicDevice,
    native_mt32: bool,
) -> (MusicDriverKind, SystemFlags) {
    match device {
        MusicDevice::AdLib => (MusicDriverKind::AdLib, SystemFlags::SBLASTER),
        MusicDevice::Mt32 => (MusicDriverKind::Mt32, SystemFlags::ROLAND),
        MusicDevice::GeneralMidi if native_mt32 => (MusicDriverKind::Mt32, SystemFlags::ROLAND),
        MusicDevice::GeneralMidi => (MusicDriverKind::GeneralMidi, SystemFlags::ROLAND),
    }
}

/// Text and speech switches for a build.
pub fn text_flags(build: &GameBuild, config: &ConfigStore) -> SystemFlags {
    if !build.cd {
        return SystemFlags::ALLOW_TEXT;
    }

    let mut flags = SystemFlags::empty();
    if config.has_key("nosubtitles") {
        log::warn!("Configuration key 'nosubtitles' is deprecated. Use 'subtitles' instead");
        if !config.get_bool("nosubtitles") {
            flags |= SystemFlags::ALLOW_TEXT;
        }
    }
    if config.get_bool("subtitles") {
        flags |= SystemFlags::ALLOW_TEXT;
    }
    if !config.get_bool("speech_mute") {
        flags |= SystemFlags::ALLOW_SPEECH;
    }
    flags
}

/// Tries the traditional Chinese executable when that language is
/// requested. An unknown or missing executable quietly selects English.
fn load_chinese_traditional(
    factory: &mut dyn SubsystemFactory,
    requested: LanguageCode,
) -> Result<(LanguageCode, Option<ResolvedBlock>), SkyError> {
    if requested != LanguageCode::ChineseTraditional {
        return Ok((requested, None));
    }

    let Some(mut exe) = factory.open_game_file(CHINESE_EXECUTABLE) else {
        log::info!("{} not found, using English", CHINESE_EXECUTABLE);
        return Ok((LanguageCode::English, None));
    };

    match locator::locate_in(&mut exe, factory.chinese_executables())? {
        Some(block) => Ok((LanguageCode::ChineseTraditional, Some(block))),
        None => {
            log::info!("{} is not a known Chinese release, using English", CHINESE_EXECUTABLE);
            Ok((LanguageCode::English, None))
        }
    }
}

impl SkyEngine {
    /// Builds every subsystem in dependency order and wires the logic,
    /// control and mouse cross links.
    pub fn boot(
        factory: &mut dyn SubsystemFactory,
        mut config: ConfigStore,
        platform: Box<dyn Platform>,
        events: Box<dyn EventSource>,
    ) -> Result<Self, SkyError> {
        log::info!("Initializing Sky engine...");
        let mut vars = SystemVars::new();

        let mut disk = factory.open_disk()?;
        let sound = factory.create_sound(&mut *disk)?;

        vars.game_version = disk.determine_game_version();
        let build = GameBuild::classify(vars.game_version)?;
        log::info!(
            "Detected game version {} (demo: {}, cd: {})",
            build.version,
            build.demo,
            build.cd
        );

        let device = factory.detect_music_device();
        let (driver, music_flag) = select_music_driver(device, config.get_bool("native_mt32"));
        vars.flags |= music_flag;
        log::info!("Music device {:?}, using {:?} driver", device, driver);
        let music = factory.create_music(driver, &mut *disk)?;

        vars.flags |= text_flags(&build, &config) | SystemFlags::PLAY_VOCS;
        vars.game_speed = DEFAULT_GAME_SPEED;

        let compact = factory.create_compact()?;
        let mut text = factory.create_text(&mut *disk, &*compact)?;
        let mouse = factory.create_mouse(&mut *disk, &*compact)?;
        let mut screen = factory.create_screen(&mut *disk, &*compact)?;

        screen.set_palette(VIRGIN_PALETTE);
        screen.show_screen(VIRGIN_SCREEN);

        let mut items = ItemTable::new();
        items.load_fixed_items(&mut *disk, build.demo)?;

        let requested = config.get_str("language").map(|tag| Language::parse(&tag));
        let requested = requested.unwrap_or(Language::Other);
        vars.text_dir_rtl = requested.right_to_left();
        let (code, chinese) = load_chinese_traditional(factory, requested.code())?;
        vars.language = language::resolve(code, |id| disk.file_exists(id))?;
        text.select_language(vars.language);
        log::info!("Language: {:?}", vars.language);

        let ctx = BootContext {
            disk: &*disk,
            sound: &*sound,
            music: &*music,
            compact: &*compact,
            text: &*text,
            mouse: &*mouse,
            screen: &*screen,
            vars: &vars,
        };
        let logic = factory.create_logic(&ctx)?;
        let control = factory.create_control(&ctx, Rc::downgrade(&logic))?;

        let mut mouse = mouse;
        mouse.use_logic_instance(Rc::downgrade(&logic));
        logic.borrow_mut().use_control_instance(Rc::downgrade(&control));

        let intro: Option<Box<dyn Intro>> = if build.has_intro() {
            Some(factory.create_intro()?)
        } else {
            None
        };

        config::register_sound_defaults(&mut config);

        let mut engine = Self {
            subsystems: Subsystems {
                control,
                logic,
                screen,
                mouse,
                text,
                compact,
                music,
                sound,
                disk,
            },
            vars,
            build,
            items,
            chinese,
            intro,
            config,
            platform,
            events,
            pending: PendingInput::default(),
            fast_mode: FastMode::empty(),
            show_grid: false,
        };
        engine.sync_sound_settings();

        log::info!("Sky engine initialized");
        Ok(engine)
    }
}
