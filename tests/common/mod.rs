// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::Cursor;
use std::rc::Rc;

use sky_engine::{
    config::ConfigStore,
    disk::Disk,
    input::{EngineEvent, EventSource},
    language::LanguageCode,
    locator::{self, SignatureEntry, CHINESE_EXECUTABLES},
    subsystems::{
        BootContext, Compact, Control, ControlLink, Intro, Logic, LogicLink, Mouse, MusicDevice,
        MusicDriver, MusicDriverKind, Platform, ReadSeek, Screen, Shared, Sound, SubsystemFactory,
        Text,
    },
    SkyEngine, SkyError,
};

pub type Journal = Rc<RefCell<Vec<String>>>;

/// Writes `"<name>.<call>"` entries and `"drop:<name>"` when dropped.
pub struct Recorder {
    journal: Journal,
    name: &'static str,
}

impl Recorder {
    fn new(journal: &Journal, name: &'static str) -> Self {
        journal.borrow_mut().push(format!("new:{}", name));
        Self {
            journal: journal.clone(),
            name,
        }
    }

    fn log(&self, call: impl AsRef<str>) {
        self.journal
            .borrow_mut()
            .push(format!("{}.{}", self.name, call.as_ref()));
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.journal.borrow_mut().push(format!("drop:{}", self.name));
    }
}

pub struct MockDisk {
    rec: Recorder,
    version: u16,
    files: HashSet<u16>,
    loads: Rc<RefCell<Vec<u16>>>,
}

impl Disk for MockDisk {
    fn load_file(&mut self, id: u16) -> Result<Vec<u8>, SkyError> {
        self.loads.borrow_mut().push(id);
        Ok(vec![id as u8; 4])
    }

    fn file_exists(&self, id: u16) -> bool {
        self.files.contains(&id)
    }

    fn determine_game_version(&self) -> u16 {
        self.rec.log("determine_game_version");
        self.version
    }
}

pub struct MockSound(Recorder);

impl Sound for MockSound {
    fn check_fx_queue(&mut self) {
        self.0.log("check_fx_queue");
    }
    fn pause_fx(&mut self) {
        self.0.log("pause_fx");
    }
    fn unpause_fx(&mut self) {
        self.0.log("unpause_fx");
    }
}

pub struct MockMusic(Recorder);

impl MusicDriver for MockMusic {
    fn set_volume(&mut self, level: u8) {
        self.0.log(format!("set_volume {}", level));
    }
    fn stop_music(&mut self) {
        self.0.log("stop_music");
    }
}

pub struct MockCompact {
    rec: Recorder,
    palette: Vec<u8>,
}

impl Compact for MockCompact {
    fn fetch_cpt(&self, id: u32) -> Option<&[u8]> {
        (id == 4316).then_some(self.palette.as_slice())
    }
}

pub struct MockText(Recorder);

impl Text for MockText {
    fn select_language(&mut self, language: LanguageCode) {
        self.0.log(format!("select_language {:?}", language));
    }
}

pub struct MockMouse {
    rec: Recorder,
    logic: Option<LogicLink>,
}

impl Mouse for MockMouse {
    fn mouse_engine(&mut self) {
        self.rec.log("mouse_engine");
    }
    fn mouse_moved(&mut self, x: i32, y: i32) {
        self.rec.log(format!("mouse_moved {},{}", x, y));
    }
    fn button_pressed(&mut self, button: u16) {
        self.rec.log(format!("button_pressed {}", button));
    }
    fn logic_click(&mut self) {
        let linked = self.logic.as_ref().and_then(|l| l.upgrade()).is_some();
        self.rec.log(format!("logic_click linked={}", linked));
    }
    fn use_logic_instance(&mut self, logic: LogicLink) {
        self.rec.log("use_logic_instance");
        self.logic = Some(logic);
    }
}

pub struct MockScreen {
    rec: Recorder,
    frames: Rc<Cell<u32>>,
}

impl Screen for MockScreen {
    fn set_palette(&mut self, id: u16) {
        self.rec.log(format!("set_palette {}", id));
    }
    fn set_palette_data(&mut self, palette: &[u8]) {
        self.rec.log(format!("set_palette_data {}", palette.len()));
    }
    fn halve_palette(&mut self) {
        self.rec.log("halve_palette");
    }
    fn show_screen(&mut self, id: u16) {
        self.rec.log(format!("show_screen {}", id));
    }
    fn clear_screen(&mut self, full: bool) {
        self.rec.log(format!("clear_screen {}", full));
    }
    fn process_sequence(&mut self) {
        self.rec.log("process_sequence");
    }
    fn recreate(&mut self) {
        self.rec.log("recreate");
    }
    fn sprite_engine(&mut self) {
        self.rec.log("sprite_engine");
    }
    fn show_grid(&mut self, grid: &[u8]) {
        self.rec.log(format!("show_grid {}", grid.len()));
    }
    fn force_refresh(&mut self) {
        self.rec.log("force_refresh");
    }
    fn flip(&mut self) {
        self.rec.log("flip");
        self.frames.set(self.frames.get() + 1);
    }
}

pub struct MockLogic {
    rec: Recorder,
    control: Option<ControlLink>,
    grid: Option<Vec<u8>>,
}

impl Logic for MockLogic {
    fn engine(&mut self) {
        let linked = self.control.as_ref().and_then(|c| c.upgrade()).is_some();
        self.rec.log(format!("engine linked={}", linked));
    }
    fn init_screen0(&mut self) {
        self.rec.log("init_screen0");
    }
    fn give_grid(&self) -> Option<Vec<u8>> {
        self.grid.clone()
    }
    fn use_control_instance(&mut self, control: ControlLink) {
        self.rec.log("use_control_instance");
        self.control = Some(control);
    }
}

pub struct MockControl {
    rec: Recorder,
    restore_result: bool,
}

impl Control for MockControl {
    fn do_control_panel(&mut self) {
        self.rec.log("do_control_panel");
    }
    fn restart_game(&mut self) {
        self.rec.log("restart_game");
    }
    fn quick_restore(&mut self, slot: u16) -> bool {
        self.rec.log(format!("quick_restore {}", slot));
        self.restore_result
    }
    fn show_game_quit_msg(&mut self) {
        self.rec.log("show_game_quit_msg");
    }
}

pub struct MockIntro {
    rec: Recorder,
    completes: bool,
}

impl Intro for MockIntro {
    fn do_intro(&mut self, floppy_intro: bool) -> bool {
        self.rec.log(format!("do_intro floppy={}", floppy_intro));
        self.completes
    }
}

pub struct MockFactory {
    pub journal: Journal,
    pub frames: Rc<Cell<u32>>,
    pub loads: Rc<RefCell<Vec<u16>>>,
    pub version: u16,
    pub files: HashSet<u16>,
    pub device: MusicDevice,
    pub exe: Option<Vec<u8>>,
    pub intro_completes: bool,
    pub restore_result: bool,
    pub grid: Option<Vec<u8>>,
    pub executables: Option<Vec<SignatureEntry>>,
}

impl SubsystemFactory for MockFactory {
    fn open_disk(&mut self) -> Result<Box<dyn Disk>, SkyError> {
        Ok(Box::new(MockDisk {
            rec: Recorder::new(&self.journal, "disk"),
            version: self.version,
            files: self.files.clone(),
            loads: self.loads.clone(),
        }))
    }

    fn create_sound(&mut self, _disk: &mut dyn Disk) -> Result<Box<dyn Sound>, SkyError> {
        Ok(Box::new(MockSound(Recorder::new(&self.journal, "sound"))))
    }

    fn detect_music_device(&mut self) -> MusicDevice {
        self.device
    }

    fn create_music(
        &mut self,
        kind: MusicDriverKind,
        _disk: &mut dyn Disk,
    ) -> Result<Box<dyn MusicDriver>, SkyError> {
        self.journal.borrow_mut().push(format!("music driver {:?}", kind));
        Ok(Box::new(MockMusic(Recorder::new(&self.journal, "music"))))
    }

    fn create_compact(&mut self) -> Result<Box<dyn Compact>, SkyError> {
        Ok(Box::new(MockCompact {
            rec: Recorder::new(&self.journal, "compact"),
            palette: vec![0; 768],
        }))
    }

    fn create_text(
        &mut self,
        _disk: &mut dyn Disk,
        _compact: &dyn Compact,
    ) -> Result<Box<dyn Text>, SkyError> {
        Ok(Box::new(MockText(Recorder::new(&self.journal, "text"))))
    }

    fn create_mouse(
        &mut self,
        _disk: &mut dyn Disk,
        _compact: &dyn Compact,
    ) -> Result<Box<dyn Mouse>, SkyError> {
        Ok(Box::new(MockMouse {
            rec: Recorder::new(&self.journal, "mouse"),
            logic: None,
        }))
    }

    fn create_screen(
        &mut self,
        _disk: &mut dyn Disk,
        _compact: &dyn Compact,
    ) -> Result<Box<dyn Screen>, SkyError> {
        Ok(Box::new(MockScreen {
            rec: Recorder::new(&self.journal, "screen"),
            frames: self.frames.clone(),
        }))
    }

    fn create_logic(&mut self, _ctx: &BootContext<'_>) -> Result<Shared<dyn Logic>, SkyError> {
        Ok(Rc::new(RefCell::new(MockLogic {
            rec: Recorder::new(&self.journal, "logic"),
            control: None,
            grid: self.grid.clone(),
        })))
    }

    fn create_control(
        &mut self,
        _ctx: &BootContext<'_>,
        _logic: LogicLink,
    ) -> Result<Shared<dyn Control>, SkyError> {
        Ok(Rc::new(RefCell::new(MockControl {
            rec: Recorder::new(&self.journal, "control"),
            restore_result: self.restore_result,
        })))
    }

    fn create_intro(&mut self) -> Result<Box<dyn Intro>, SkyError> {
        Ok(Box::new(MockIntro {
            rec: Recorder::new(&self.journal, "intro"),
            completes: self.intro_completes,
        }))
    }

    fn open_game_file(&mut self, name: &str) -> Option<Box<dyn ReadSeek>> {
        self.journal.borrow_mut().push(format!("open {}", name));
        let data = self.exe.clone()?;
        Some(Box::new(Cursor::new(data)))
    }

    fn chinese_executables(&self) -> &[SignatureEntry] {
        self.executables.as_deref().unwrap_or(CHINESE_EXECUTABLES)
    }
}

/// A small executable image with an eight pointer string index and one
/// Big5 glyph, plus the signature entry that recognises it.
pub fn chinese_executable() -> (Vec<u8>, SignatureEntry) {
    const BASE: u32 = 0x10;
    const INDEX_AT: usize = 0x40;
    const FONT_AT: usize = 0x180;
    const POINTERS: [u32; 8] = [0xA0, 0x90, 0xC0, 0x100, 0xB0, 0x120, 0x140, 0x150];

    let mut data: Vec<u8> = (0..0x200).map(|i| (i % 251) as u8).collect();
    for (i, pointer) in POINTERS.iter().enumerate() {
        let at = INDEX_AT + i * 4;
        data[at..at + 4].copy_from_slice(&pointer.to_le_bytes());
    }
    let mut font = 0xA440u16.to_be_bytes().to_vec();
    font.extend([0x55u8; 30]);
    font.extend([0xFF, 0xFF]);
    data[FONT_AT..FONT_AT + font.len()].copy_from_slice(&font);

    let (md5, length) = locator::fingerprint(&mut Cursor::new(&data)).unwrap();
    let entry = SignatureEntry {
        md5: Box::leak(md5.into_boxed_str()),
        length,
        virtual_base: BASE,
        index_offset: INDEX_AT as u64,
        font_offset: FONT_AT as u64,
        block_end: FONT_AT as u64,
    };
    (data, entry)
}

/// Simulated millisecond clock; only `delay_millis` advances time.
pub struct FakePlatform {
    clock: Rc<Cell<u32>>,
    frames: Rc<Cell<u32>>,
    quit_at_ms: Option<u32>,
    quit_after_frames: Option<u32>,
}

impl Platform for FakePlatform {
    fn millis(&self) -> u32 {
        self.clock.get()
    }

    fn delay_millis(&mut self, amount: u32) {
        self.clock.set(self.clock.get() + amount);
    }

    fn update_screen(&mut self) {}

    fn should_quit(&self) -> bool {
        self.quit_at_ms.map_or(false, |at| self.clock.get() >= at)
            || self.quit_after_frames.map_or(false, |n| self.frames.get() >= n)
    }
}

/// Events become visible once the clock reaches their timestamp.
pub struct ScriptedEvents {
    clock: Rc<Cell<u32>>,
    events: Rc<RefCell<Vec<(u32, EngineEvent)>>>,
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Option<EngineEvent> {
        let mut events = self.events.borrow_mut();
        let due = events.first().map_or(false, |(at, _)| *at <= self.clock.get());
        due.then(|| events.remove(0).1)
    }
}

pub struct Harness {
    pub journal: Journal,
    pub clock: Rc<Cell<u32>>,
    pub frames: Rc<Cell<u32>>,
    pub events: Rc<RefCell<Vec<(u32, EngineEvent)>>>,
    pub quit_at_ms: Option<u32>,
    pub quit_after_frames: Option<u32>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            journal: Rc::new(RefCell::new(Vec::new())),
            clock: Rc::new(Cell::new(0)),
            frames: Rc::new(Cell::new(0)),
            events: Rc::new(RefCell::new(Vec::new())),
            quit_at_ms: None,
            quit_after_frames: None,
        }
    }

    /// A full CD release with English text and an intro the player watches.
    pub fn factory(&self) -> MockFactory {
        MockFactory {
            journal: self.journal.clone(),
            frames: self.frames.clone(),
            loads: Rc::new(RefCell::new(Vec::new())),
            version: 368,
            files: [60600].into_iter().collect(),
            device: MusicDevice::AdLib,
            exe: None,
            intro_completes: true,
            restore_result: false,
            grid: None,
            executables: None,
        }
    }

    pub fn push_event(&self, at: u32, event: EngineEvent) {
        self.events.borrow_mut().push((at, event));
    }

    pub fn boot(
        &self,
        factory: &mut MockFactory,
        config: ConfigStore,
    ) -> Result<SkyEngine, SkyError> {
        let platform = FakePlatform {
            clock: self.clock.clone(),
            frames: self.frames.clone(),
            quit_at_ms: self.quit_at_ms,
            quit_after_frames: self.quit_after_frames,
        };
        let events = ScriptedEvents {
            clock: self.clock.clone(),
            events: self.events.clone(),
        };
        SkyEngine::boot(factory, config, Box::new(platform), Box::new(events))
    }

    pub fn entries(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    pub fn clear(&self) {
        self.journal.borrow_mut().clear();
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.journal.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.journal.borrow().iter().position(|e| e == entry)
    }
}
