//! Canned demo data for trying the forge without a gateway.

use crate::model::{AddonConfig, AddonFile, AddonType, FeedbackEntry, FileType};

/// The generation form used by `--sample` runs.
pub fn config() -> AddonConfig {
    AddonConfig {
        addon_type: AddonType::Combat,
        addon_name: ADDON_NAME.to_string(),
        features: "Real-time DPS tracking with raid analytics".to_string(),
        ui_layout: "Movable main frame with sorted DPS bars".to_string(),
        behavior: "COMBAT_LOG_EVENT_UNFILTERED, /dps slash command, SavedVariables".to_string(),
        toc_version: "1.0.0".to_string(),
        toc_author: "AddonForge".to_string(),
        toc_deps: "Ace3".to_string(),
        toc_interface: "110002".to_string(),
    }
}

/// Name shown for the sample session.
pub const ADDON_NAME: &str = "DPSMeterPro";

/// The sample addon's files.
pub fn files() -> Vec<AddonFile> {
    vec![
        file(
            "MyAddon.toc",
            MYADDON_TOC,
            FileType::Manifest,
            "Table of Contents file with addon metadata",
        ),
        file("Core.lua", CORE_LUA, FileType::Script, "Core addon logic with event handling"),
        file("UI.lua", UI_LUA, FileType::Script, "UI creation and management"),
        file("UI.xml", UI_XML, FileType::Markup, "XML frame templates for DPS bars"),
    ]
}

/// A short refine conversation to go with the sample files.
pub fn feedback() -> Vec<FeedbackEntry> {
    vec![
        FeedbackEntry::user("Can you add a minimap button to toggle the addon window?"),
        FeedbackEntry::agent(
            "Added LibDBIcon-1.0 integration for minimap button. The addon now registers a \
             minimap icon that toggles the main frame visibility on click. Updated Core.lua \
             with minimap initialization and UI.lua with toggle functionality.",
        ),
    ]
}

/// A directory listing for a set of files, in the shape agents return.
pub fn file_tree(files: &[AddonFile]) -> String {
    let mut tree = format!("{ADDON_NAME}/");
    for (i, file) in files.iter().enumerate() {
        let branch = if i + 1 == files.len() { "└──" } else { "├──" };
        tree.push_str(&format!("\n{branch} {}", file.filename));
    }
    tree
}

fn file(filename: &str, content: &str, file_type: FileType, description: &str) -> AddonFile {
    AddonFile {
        filename: filename.to_string(),
        content: content.to_string(),
        file_type,
        description: Some(description.to_string()),
    }
}

const MYADDON_TOC: &str = r#"## Interface: 110002
## Title: DPS Meter Pro
## Notes: Advanced DPS meter with raid analytics
## Author: AddonForge
## Version: 1.0.0
## SavedVariables: DPSMeterProDB

Core.lua
UI.lua
UI.xml"#;

const CORE_LUA: &str = r#"local addonName, addon = ...
local DPSMeterPro = LibStub("AceAddon-3.0"):NewAddon(addonName)

-- Database defaults
local defaults = {
  profile = {
    minimap = { hide = false },
    width = 250,
    height = 300,
    showRank = true,
  }
}

function DPSMeterPro:OnInitialize()
  self.db = LibStub("AceDB-3.0"):New("DPSMeterProDB", defaults, true)
  self:RegisterEvent("COMBAT_LOG_EVENT_UNFILTERED")
  self:Print("DPS Meter Pro loaded successfully!")
end

function DPSMeterPro:OnEnable()
  self:UpdateDisplay()
end

function DPSMeterPro:COMBAT_LOG_EVENT_UNFILTERED()
  local timestamp, event, _, sourceGUID = CombatLogGetCurrentEventInfo()
  if event == "SWING_DAMAGE" or event == "SPELL_DAMAGE" then
    -- Track damage
    self:ProcessDamageEvent(sourceGUID)
  end
end

function DPSMeterPro:ProcessDamageEvent(guid)
  -- Process and store damage data
  local name = select(6, GetPlayerInfoByGUID(guid))
  if name then
    self.db.profile.data = self.db.profile.data or {}
    self.db.profile.data[name] = (self.db.profile.data[name] or 0) + 1
  end
end"#;

const UI_LUA: &str = r#"local addonName, addon = ...
local DPSMeterPro = LibStub("AceAddon-3.0"):GetAddon(addonName)

function DPSMeterPro:CreateMainFrame()
  local frame = CreateFrame("Frame", "DPSMeterProFrame", UIParent, "BackdropTemplate")
  frame:SetSize(self.db.profile.width, self.db.profile.height)
  frame:SetPoint("CENTER")
  frame:SetMovable(true)
  frame:EnableMouse(true)
  frame:RegisterForDrag("LeftButton")
  frame:SetScript("OnDragStart", frame.StartMoving)
  frame:SetScript("OnDragStop", frame.StopMovingOrSizing)
  
  -- Backdrop
  frame:SetBackdrop({
    bgFile = "Interface\\Tooltips\\UI-Tooltip-Background",
    edgeFile = "Interface\\Tooltips\\UI-Tooltip-Border",
    tile = true, tileSize = 16, edgeSize = 16,
    insets = { left = 4, right = 4, top = 4, bottom = 4 }
  })
  frame:SetBackdropColor(0, 0, 0, 0.8)
  
  self.mainFrame = frame
  return frame
end

function DPSMeterPro:UpdateDisplay()
  if not self.mainFrame then
    self:CreateMainFrame()
  end
  -- Refresh bars
end"#;

const UI_XML: &str = r#"<Ui xmlns="http://www.blizzard.com/wow/ui/">
  <Frame name="DPSMeterProTemplate" virtual="true">
    <Size x="200" y="20"/>
    <Layers>
      <Layer level="BACKGROUND">
        <Texture name="$parentBar" setAllPoints="true">
          <Color r="0.2" g="0.6" b="1.0" a="0.8"/>
        </Texture>
      </Layer>
      <Layer level="OVERLAY">
        <FontString name="$parentName" inherits="GameFontNormal">
          <Anchors>
            <Anchor point="LEFT" x="4" y="0"/>
          </Anchors>
        </FontString>
        <FontString name="$parentDPS" inherits="GameFontNormal">
          <Anchors>
            <Anchor point="RIGHT" x="-4" y="0"/>
          </Anchors>
        </FontString>
      </Layer>
    </Layers>
  </Frame>
</Ui>"#;
