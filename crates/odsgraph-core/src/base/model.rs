//! The fixed base model tables.

use super::{BaseAttribute, BaseElement, BaseRelation};
use crate::types::{DataKind, DataType, RelationRange};

const fn attr(name: &'static str, data_type: DataType) -> BaseAttribute {
    BaseAttribute { name, data_type: Some(data_type), unique: false, enum_type: None }
}

const fn enum_attr(name: &'static str, enum_type: &'static str) -> BaseAttribute {
    BaseAttribute {
        name,
        data_type: Some(DataType::scalar(DataKind::Enum)),
        unique: false,
        enum_type: Some(enum_type),
    }
}

const fn rel(name: &'static str, target: &'static str, range: RelationRange) -> BaseRelation {
    BaseRelation { name, target, range }
}

const STRING: DataType = DataType::scalar(DataKind::String);
const STRINGS: DataType = DataType::sequence(DataKind::String);
const DATE: DataType = DataType::scalar(DataKind::Date);
const LONG: DataType = DataType::scalar(DataKind::Int32);
const LONGS: DataType = DataType::sequence(DataKind::Int32);
const LONGLONG: DataType = DataType::scalar(DataKind::Int64);
const SHORT: DataType = DataType::scalar(DataKind::Short);
const SHORTS: DataType = DataType::sequence(DataKind::Short);
const DOUBLE: DataType = DataType::scalar(DataKind::Float64);
const DOUBLES: DataType = DataType::sequence(DataKind::Float64);
const BOOLEAN: DataType = DataType::scalar(DataKind::Boolean);

const ONE: RelationRange = RelationRange::EXACTLY_ONE;
const OPT: RelationRange = RelationRange::OPTIONAL;
const MANY: RelationRange = RelationRange::MANY;

/// Attributes every base element carries.
pub(super) const COMMON_ATTRIBUTES: &[BaseAttribute] = &[
    BaseAttribute { name: "id", data_type: Some(LONGLONG), unique: true, enum_type: None },
    attr("name", STRING),
    attr("version", STRING),
    attr("description", STRING),
    attr("version_date", DATE),
    attr("mime_type", STRING),
    attr("external_references", DataType::sequence(DataKind::ExternalReference)),
    attr("objecttype", LONGLONG),
];

pub(super) const ELEMENTS: &[BaseElement] = &[
    BaseElement {
        name: "AoEnvironment",
        attributes: &[
            attr("max_test_level", LONG),
            attr("base_model_version", STRING),
            attr("application_model_type", STRING),
            attr("application_model_version", STRING),
            attr("timezone", STRING),
            attr("meaning_of_aliases", STRINGS),
        ],
        relations: &[],
    },
    BaseElement {
        name: "AoNameMap",
        attributes: &[attr("entity_name", STRING), attr("alias_names", STRINGS)],
        relations: &[rel("attribute_mapping", "AoAttributeMap", MANY)],
    },
    BaseElement {
        name: "AoAttributeMap",
        attributes: &[attr("attribute_name", STRING), attr("alias_names", STRINGS)],
        relations: &[rel("name_mapping", "AoNameMap", ONE)],
    },
    BaseElement {
        name: "AoQuantity",
        attributes: &[
            attr("default_rank", LONG),
            attr("default_dimension", LONGS),
            attr("default_type_size", LONG),
            attr("default_mq_name", STRING),
            enum_attr("default_datatype", "datatype_enum"),
        ],
        relations: &[
            rel("default_unit", "AoUnit", OPT),
            rel("groups", "AoQuantityGroup", MANY),
            rel("measurement_quantities", "AoMeasurementQuantity", MANY),
        ],
    },
    BaseElement {
        name: "AoUnit",
        attributes: &[attr("factor", DOUBLE), attr("offset", DOUBLE)],
        relations: &[
            rel("phys_dimension", "AoPhysicalDimension", ONE),
            rel("groups", "AoUnitGroup", MANY),
            rel("quantities", "AoQuantity", MANY),
            rel("measurement_quantities", "AoMeasurementQuantity", MANY),
        ],
    },
    BaseElement {
        name: "AoPhysicalDimension",
        attributes: &[
            attr("length_exp", LONG),
            attr("mass_exp", LONG),
            attr("time_exp", LONG),
            attr("current_exp", LONG),
            attr("temperature_exp", LONG),
            attr("molar_amount_exp", LONG),
            attr("luminous_intensity_exp", LONG),
        ],
        relations: &[rel("units", "AoUnit", MANY)],
    },
    BaseElement {
        name: "AoQuantityGroup",
        attributes: &[],
        relations: &[rel("quantities", "AoQuantity", MANY)],
    },
    BaseElement { name: "AoUnitGroup", attributes: &[], relations: &[rel("units", "AoUnit", MANY)] },
    BaseElement {
        name: "AoTest",
        attributes: &[],
        relations: &[rel("children", "AoSubTest", MANY)],
    },
    BaseElement {
        name: "AoSubTest",
        attributes: &[],
        relations: &[
            rel("parent_test", "AoTest", ONE),
            rel("children", "AoMeasurement", MANY),
            rel("units_under_test", "AoUnitUnderTest", MANY),
        ],
    },
    BaseElement {
        name: "AoMeasurement",
        attributes: &[attr("measurement_begin", DATE), attr("measurement_end", DATE)],
        relations: &[
            rel("test", "AoSubTest", ONE),
            rel("measurement_quantities", "AoMeasurementQuantity", MANY),
            rel("submatrices", "AoSubmatrix", MANY),
            rel("units_under_test", "AoUnitUnderTest", MANY),
            rel("sequences", "AoTestSequence", MANY),
            rel("equipments", "AoTestEquipment", MANY),
        ],
    },
    BaseElement {
        name: "AoMeasurementQuantity",
        attributes: &[
            enum_attr("datatype", "datatype_enum"),
            attr("rank", LONG),
            attr("dimension", LONGS),
            attr("type_size", LONG),
            enum_attr("interpolation", "interpolation_enum"),
            attr("minimum", DOUBLE),
            attr("maximum", DOUBLE),
            attr("average", DOUBLE),
            attr("standard_deviation", DOUBLE),
        ],
        relations: &[
            rel("measurement", "AoMeasurement", ONE),
            rel("unit", "AoUnit", OPT),
            rel("quantity", "AoQuantity", OPT),
            rel("local_columns", "AoLocalColumn", MANY),
        ],
    },
    BaseElement {
        name: "AoSubmatrix",
        attributes: &[attr("number_of_rows", LONG)],
        relations: &[
            rel("measurement", "AoMeasurement", ONE),
            rel("local_columns", "AoLocalColumn", MANY),
        ],
    },
    BaseElement {
        name: "AoLocalColumn",
        attributes: &[
            attr("flags", SHORTS),
            attr("global_flag", SHORT),
            attr("independent", SHORT),
            attr("minimum", DOUBLE),
            attr("maximum", DOUBLE),
            enum_attr("sequence_representation", "seq_rep_enum"),
            attr("generation_parameters", DOUBLES),
            enum_attr("raw_datatype", "datatype_enum"),
            // The data type of `values` follows the measurement quantity.
            BaseAttribute { name: "values", data_type: None, unique: false, enum_type: None },
        ],
        relations: &[
            rel("submatrix", "AoSubmatrix", ONE),
            rel("measurement_quantity", "AoMeasurementQuantity", ONE),
            rel("external_component", "AoExternalComponent", MANY),
        ],
    },
    BaseElement {
        name: "AoExternalComponent",
        attributes: &[
            attr("ordinal_number", LONG),
            attr("component_length", LONG),
            attr("filename_url", STRING),
            enum_attr("value_type", "typespec_enum"),
            attr("start_offset", LONGLONG),
            attr("block_size", LONG),
            attr("valuesperblock", LONG),
            attr("value_offset", LONG),
            attr("flags_filename_url", STRING),
            attr("flags_start_offset", LONGLONG),
            attr("bit_count", SHORT),
            attr("bit_offset", SHORT),
        ],
        relations: &[rel("local_column", "AoLocalColumn", ONE)],
    },
    BaseElement {
        name: "AoUnitUnderTest",
        attributes: &[],
        relations: &[
            rel("children", "AoUnitUnderTestPart", MANY),
            rel("measurement", "AoMeasurement", MANY),
        ],
    },
    BaseElement {
        name: "AoUnitUnderTestPart",
        attributes: &[],
        relations: &[
            rel("parent_unit_under_test", "AoUnitUnderTest", ONE),
            rel("children", "AoUnitUnderTestPart", MANY),
        ],
    },
    BaseElement {
        name: "AoTestSequence",
        attributes: &[],
        relations: &[
            rel("children", "AoTestSequencePart", MANY),
            rel("measurement", "AoMeasurement", MANY),
        ],
    },
    BaseElement {
        name: "AoTestSequencePart",
        attributes: &[],
        relations: &[
            rel("parent_sequence", "AoTestSequence", ONE),
            rel("children", "AoTestSequencePart", MANY),
        ],
    },
    BaseElement {
        name: "AoTestEquipment",
        attributes: &[],
        relations: &[
            rel("children", "AoTestEquipmentPart", MANY),
            rel("measurement", "AoMeasurement", MANY),
        ],
    },
    BaseElement {
        name: "AoTestEquipmentPart",
        attributes: &[],
        relations: &[
            rel("parent_equipment", "AoTestEquipment", ONE),
            rel("children", "AoTestDevice", MANY),
        ],
    },
    BaseElement {
        name: "AoTestDevice",
        attributes: &[],
        relations: &[rel("parent_equipment_part", "AoTestEquipmentPart", ONE)],
    },
    BaseElement {
        name: "AoUser",
        attributes: &[attr("password", STRING), attr("alias_name", STRING)],
        relations: &[rel("groups", "AoUserGroup", MANY)],
    },
    BaseElement {
        name: "AoUserGroup",
        attributes: &[attr("superuser_flag", BOOLEAN)],
        relations: &[rel("users", "AoUser", MANY)],
    },
    BaseElement {
        name: "AoAny",
        attributes: &[],
        relations: &[rel("parent", "AoAny", OPT), rel("children", "AoAny", MANY)],
    },
    BaseElement {
        name: "AoLog",
        attributes: &[attr("date", DATE)],
        relations: &[rel("parent", "AoLog", OPT), rel("children", "AoLog", MANY)],
    },
    BaseElement {
        name: "AoParameter",
        attributes: &[enum_attr("parameter_datatype", "datatype_enum"), attr("pvalue", STRING)],
        relations: &[rel("parameter_set", "AoParameterSet", ONE), rel("unit", "AoUnit", OPT)],
    },
    BaseElement {
        name: "AoParameterSet",
        attributes: &[],
        relations: &[rel("parameters", "AoParameter", MANY)],
    },
];

/// Elements that must carry a value for `external_references`.
const EXTERNAL_REFERENCE_ELEMENTS: &[&str] = &[
    "AoEnvironment",
    "AoNameMap",
    "AoAttributeMap",
    "AoQuantity",
    "AoUnit",
    "AoPhysicalDimension",
    "AoQuantityGroup",
    "AoUnitGroup",
    "AoMeasurement",
    "AoMeasurementQuantity",
    "AoSubmatrix",
    "AoLocalColumn",
    "AoExternalComponent",
    "AoTest",
    "AoSubTest",
    "AoUnitUnderTest",
    "AoUnitUnderTestPart",
    "AoTestSequence",
    "AoTestSequencePart",
    "AoTestEquipment",
    "AoTestEquipmentPart",
    "AoTestDevice",
    "AoUser",
    "AoUserGroup",
    "AoAny",
    "AoLog",
    "AoParameter",
    "AoParameterSet",
];

/// Base attribute name → elements it is obligatory for (`None`: every element).
pub(super) const OBLIGATORY: &[(&str, Option<&[&str]>)] = &[
    ("id", None),
    ("name", None),
    ("external_references", Some(EXTERNAL_REFERENCE_ELEMENTS)),
    ("meaning_of_aliases", Some(&["AoEnvironment"])),
    ("entity_name", Some(&["AoNameMap", "AoAttributeMap"])),
    ("alias_names", Some(&["AoNameMap", "AoAttributeMap"])),
    ("default_dimension", Some(&["AoQuantity"])),
    ("factor", Some(&["AoUnit"])),
    ("offset", Some(&["AoUnit"])),
    ("length_exp", Some(&["AoPhysicalDimension"])),
    ("mass_exp", Some(&["AoPhysicalDimension"])),
    ("time_exp", Some(&["AoPhysicalDimension"])),
    ("current_exp", Some(&["AoPhysicalDimension"])),
    ("temperature_exp", Some(&["AoPhysicalDimension"])),
    ("molar_amount_exp", Some(&["AoPhysicalDimension"])),
    ("luminous_intensity_exp", Some(&["AoPhysicalDimension"])),
    ("datatype", Some(&["AoMeasurementQuantity"])),
    ("dimension", Some(&["AoMeasurementQuantity"])),
    ("number_of_rows", Some(&["AoSubmatrix"])),
    ("flags", Some(&["AoLocalColumn"])),
    ("independent", Some(&["AoLocalColumn"])),
    ("sequence_representation", Some(&["AoLocalColumn"])),
    ("generation_parameters", Some(&["AoLocalColumn"])),
    ("component_length", Some(&["AoExternalComponent"])),
    ("filename_url", Some(&["AoExternalComponent"])),
    ("value_type", Some(&["AoExternalComponent"])),
    ("password", Some(&["AoUser"])),
    ("superuser_flag", Some(&["AoUserGroup"])),
    ("date", Some(&["AoLog"])),
    ("parameter_datatype", Some(&["AoParameter"])),
    ("pvalue", Some(&["AoParameter"])),
];
