use gns3_domain::Drawing;
use gns3_domain_types::DrawingId;
use gns3_protocol::DrawingDto;

pub fn drawing_to_dto(drawing: &Drawing) -> DrawingDto {
    DrawingDto {
        drawing_id: Some(drawing.id.to_string()),
        svg: drawing.svg.clone(),
        x: drawing.x,
        y: drawing.y,
        z: drawing.z,
        rotation: drawing.rotation,
        locked: drawing.locked,
    }
}

pub fn drawing_from_dto(dto: &DrawingDto) -> Drawing {
    let id = dto
        .drawing_id
        .as_deref()
        .and_then(|s| s.parse::<DrawingId>().ok())
        .unwrap_or_else(DrawingId::new);
    Drawing {
        id,
        svg: dto.svg.clone(),
        x: dto.x,
        y: dto.y,
        z: dto.z,
        rotation: dto.rotation,
        locked: dto.locked,
    }
}
