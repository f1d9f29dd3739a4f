use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject, SingleOrVec};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::metadata::{default_of, extension_bool, extension_value, title_of};

/// How a single property is edited inside a form session.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    Text,
    Date,
    Flag,
    Choice(Vec<String>),
    FieldArray(FieldArraySpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub shape: FieldShape,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldArraySpec {
    /// Value appended when the user adds an entry.
    pub zero: Value,
    pub min_items: usize,
    /// Titles of the entry members keyed by member name. Empty for scalar entries.
    pub members: IndexMap<String, String>,
    /// Title used for scalar entries.
    pub item_title: String,
}

impl FieldArraySpec {
    pub fn requires_entry(&self) -> bool {
        self.min_items > 0
    }

    pub fn member_title(&self, member: Option<&str>) -> &str {
        member
            .and_then(|name| self.members.get(name))
            .map(String::as_str)
            .unwrap_or(self.item_title.as_str())
    }
}

/// Coupled start/end/ongoing properties declared through `x-date-range`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DateRangeSpec {
    pub start: String,
    pub end: String,
    pub ongoing: String,
    #[serde(default)]
    pub as_of: Option<String>,
}

impl DateRangeSpec {
    pub fn owns(&self, field: &str) -> bool {
        field == self.start
            || field == self.end
            || field == self.ongoing
            || self.as_of.as_deref() == Some(field)
    }
}

/// Form layout of one block type, read from its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub fields: IndexMap<String, FieldSpec>,
    pub date_range: Option<DateRangeSpec>,
    pub defaults: Map<String, Value>,
}

impl BlockLayout {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn field_arrays(&self) -> impl Iterator<Item = (&str, &FieldArraySpec)> {
        self.fields.values().filter_map(|field| match &field.shape {
            FieldShape::FieldArray(spec) => Some((field.name.as_str(), spec)),
            _ => None,
        })
    }

    pub fn supports_link(&self) -> bool {
        self.fields.contains_key("link")
    }

    pub fn title_of(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|field| field.title.clone())
            .unwrap_or_else(|| super::metadata::prettify_label(name))
    }
}

pub fn parse_layout(schema: &Value) -> Result<BlockLayout> {
    let root: RootSchema =
        serde_json::from_value(schema.clone()).context("block schema is not a JSON Schema")?;
    let object = root
        .schema
        .object
        .as_ref()
        .ok_or_else(|| anyhow!("block schema must describe an object"))?;

    let mut fields = IndexMap::new();
    for (name, property) in &object.properties {
        let property = schema_object(property)
            .with_context(|| format!("property `{name}` must be a schema object"))?;
        let spec = FieldSpec {
            name: name.clone(),
            title: title_of(property, name),
            shape: field_shape(property, name)?,
            required: object.required.contains(name),
        };
        fields.insert(name.clone(), spec);
    }

    let date_range = match extension_value(&root.schema, "x-date-range") {
        Some(raw) => {
            let spec: DateRangeSpec =
                serde_json::from_value(raw.clone()).context("invalid x-date-range")?;
            check_date_range(&spec, &fields)?;
            Some(spec)
        }
        None => None,
    };

    let defaults = match default_of(&root.schema) {
        Some(Value::Object(map)) => map,
        Some(_) => bail!("block schema default must be an object"),
        None => Map::new(),
    };

    Ok(BlockLayout {
        fields,
        date_range,
        defaults,
    })
}

fn field_shape(property: &SchemaObject, name: &str) -> Result<FieldShape> {
    if extension_bool(property, "x-field-array") {
        return field_array_spec(property, name).map(FieldShape::FieldArray);
    }
    if extension_bool(property, "x-date") {
        return Ok(FieldShape::Date);
    }
    if let Some(options) = &property.enum_values {
        let options = options
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();
        return Ok(FieldShape::Choice(options));
    }
    if has_type(property, InstanceType::Boolean) {
        return Ok(FieldShape::Flag);
    }
    Ok(FieldShape::Text)
}

fn field_array_spec(property: &SchemaObject, name: &str) -> Result<FieldArraySpec> {
    let array = property
        .array
        .as_ref()
        .ok_or_else(|| anyhow!("field array `{name}` must declare items"))?;
    let item = match &array.items {
        Some(SingleOrVec::Single(item)) => schema_object(item)
            .with_context(|| format!("field array `{name}` items must be a schema object"))?,
        _ => bail!("field array `{name}` must use a single item schema"),
    };
    let members = item
        .object
        .as_ref()
        .map(|object| {
            object
                .properties
                .iter()
                .filter_map(|(member, schema)| {
                    schema_object(schema).map(|schema| (member.clone(), title_of(schema, member)))
                })
                .collect()
        })
        .unwrap_or_default();
    let zero = default_of(item).unwrap_or_else(|| {
        if has_type(item, InstanceType::Object) {
            Value::Object(Map::new())
        } else {
            Value::String(String::new())
        }
    });
    Ok(FieldArraySpec {
        zero,
        min_items: array.min_items.unwrap_or(0) as usize,
        members,
        item_title: title_of(item, name),
    })
}

fn check_date_range(spec: &DateRangeSpec, fields: &IndexMap<String, FieldSpec>) -> Result<()> {
    let require_shape = |name: &str, shape: &FieldShape| -> Result<()> {
        match fields.get(name) {
            Some(field) if &field.shape == shape => Ok(()),
            Some(_) => bail!("x-date-range property `{name}` has the wrong type"),
            None => bail!("x-date-range names unknown property `{name}`"),
        }
    };
    require_shape(&spec.start, &FieldShape::Date)?;
    require_shape(&spec.end, &FieldShape::Date)?;
    require_shape(&spec.ongoing, &FieldShape::Flag)?;
    if let Some(as_of) = &spec.as_of {
        require_shape(as_of, &FieldShape::Date)?;
    }
    Ok(())
}

fn schema_object(schema: &Schema) -> Option<&SchemaObject> {
    match schema {
        Schema::Object(object) => Some(object),
        Schema::Bool(_) => None,
    }
}

fn has_type(schema: &SchemaObject, expected: InstanceType) -> bool {
    match &schema.instance_type {
        Some(SingleOrVec::Single(kind)) => **kind == expected,
        Some(SingleOrVec::Vec(kinds)) => kinds.contains(&expected),
        None => false,
    }
}
