use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "starmaps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub observed_at: DateTimeWithTimeZone,
    pub utc_offset_hours: i32,
    pub title: Option<String>,
    #[sea_orm(column_type = "Blob")]
    pub image_data: Vec<u8>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub extra_data: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
