pub mod link_dto;

pub use link_dto::{
    AddLinkTagDto, CreateLinkDto, LinkResponseDto, MoveLinkDto, PlatformDto, SyncLinkTagsDto,
    UpdateLinkDto,
};
