mod message;
mod message_pack;
mod plural_count;
mod plural_form;
mod template_data;
mod value;

pub use message::Message;
pub use message_pack::MessagePack;
pub use plural_count::PluralCount;
pub use plural_form::PluralForm;
pub use template_data::TemplateData;
pub use value::Value;
