//! Edge case tests for the resolver, exercised through real Ada
//! source (parsed with `adac-par`) rather than by poking the tables
//! directly - the cases that matter are what a declarative part full
//! of overloads, subtypes and generics resolves to.

#[cfg(test)]
mod tests {
    use crate::resolver::Resolver;
    use adac_par::Parser;
    use adac_util::Handler;

    fn check(src: &str) -> Handler {
        let mut handler = Handler::new_panicking();
        let unit = {
            let mut parser = Parser::new(src, &mut handler);
            parser.parse_compilation_unit().expect("parse failed")
        };
        let mut resolver = Resolver::new(&mut handler);
        resolver.analyze(&unit);
        handler
    }

    fn ok(src: &str) {
        let handler = check(src);
        assert!(!handler.has_errors(), "expected no errors, got {} for:\n{src}", handler.error_count());
    }

    fn fails(src: &str) {
        let handler = check(src);
        assert!(handler.has_errors(), "expected errors for:\n{src}");
    }

    #[test]
    fn undefined_variable_reference() {
        fails("procedure P is\nbegin\n   X := 1;\nend P;\n");
    }

    #[test]
    fn undefined_subprogram_call() {
        fails("procedure P is\nbegin\n   Foo(1);\nend P;\n");
    }

    #[test]
    fn type_mismatch_on_object_initialization() {
        fails("procedure P is\n   X : Boolean := 5;\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn type_mismatch_on_assignment() {
        fails(
            "procedure P is\n   X : Boolean;\n   Y : Integer := 1;\nbegin\n   X := Y;\nend P;\n",
        );
    }

    #[test]
    fn overload_resolution_by_arity_picks_unique_match() {
        ok("procedure P is\n   procedure Put(X : Integer) is\n   begin\n      null;\n   end Put;\n   procedure Put(X : Integer; Y : Integer) is\n   begin\n      null;\n   end Put;\nbegin\n   Put(1);\n   Put(1, 2);\nend P;\n");
    }

    #[test]
    fn derived_type_inherits_integer_bounds() {
        ok("procedure P is\n   type Base is range 1 .. 100;\n   type Derived_Type is new Base;\n   X : Derived_Type := 5;\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn enumeration_literal_resolves_to_its_type() {
        ok("procedure P is\n   type Color is (Red, Green, Blue);\n   C : Color := Green;\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn universal_integer_literal_covers_any_integer_subtype() {
        ok("procedure P is\n   subtype Small is Integer range 1 .. 10;\n   X : Small := 5;\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn array_aggregate_initializes_array_object() {
        ok("procedure P is\n   type Vec is array (1 .. 3) of Integer;\n   V : Vec := (1, 2, 3);\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn record_component_selector_resolves_field_type() {
        ok("procedure P is\n   type Point is record\n      X : Integer;\n      Y : Integer;\n   end record;\n   P1 : Point;\nbegin\n   P1.X := 1;\nend P;\n");
    }

    #[test]
    fn generic_instantiation_resolves_formal_type_to_actual() {
        ok("procedure P is\n   generic\n      type Item is private;\n   procedure Swap(A, B : in out Item);\n   procedure Swap(A, B : in out Item) is\n      Temp : Item;\n   begin\n      Temp := A;\n      A := B;\n      B := Temp;\n   end Swap;\n   procedure Swap_Int is new Swap(Integer);\n   X, Y : Integer := 1;\nbegin\n   Swap_Int(X, Y);\nend P;\n");
    }

    #[test]
    fn attribute_first_last_resolve_on_a_range_type() {
        ok("procedure P is\n   subtype Digit is Integer range 0 .. 9;\n   Low : Integer := Digit'First;\n   High : Integer := Digit'Last;\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn exit_with_unknown_label_is_an_error() {
        fails("procedure P is\nbegin\n   loop\n      exit Nonexistent_Label;\n   end loop;\nend P;\n");
    }

    #[test]
    fn unknown_attribute_designator_is_an_error() {
        fails("procedure P is\n   X : Integer := Integer'Bogus;\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn unknown_suppress_pragma_argument_is_an_error() {
        fails("procedure P is\n   pragma Suppress(Not_A_Real_Check);\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn nested_block_scope_hides_outer_declaration() {
        ok("procedure P is\n   X : Integer := 1;\nbegin\n   declare\n      X : Boolean := True;\n   begin\n      null;\n   end;\nend P;\n");
    }

    #[test]
    fn package_spec_and_body_declarations_both_resolve() {
        ok("procedure P is\n   package Pkg is\n      X : Integer := 1;\n   end Pkg;\n   package body Pkg is\n   begin\n      null;\n   end Pkg;\nbegin\n   null;\nend P;\n");
    }

    #[test]
    fn for_loop_variable_is_visible_only_inside_the_loop() {
        fails(
            "procedure P is\nbegin\n   for I in 1 .. 10 loop\n      null;\n   end loop;\n   X := I;\nend P;\n",
        );
    }
}
